//! Level computation: the modulus, the level count, level capacity, and the
//! O(1) bitwise rank selector (spec.md §4.1, §4.5).
//!
//! Grounded on `examples/original_source/src/wave.{c,h}`'s
//! `waveComputeTotalLevel`/`waveModulo`/`waveNumLevels`/
//! `waveLevelMaxPositions`, adapted to Rust's fixed-width integers and
//! `leading_zeros` in place of `floor(log2(...))`.

/// Hard cap on the number of levels (spec.md §2: "capped at 63").
pub const MAX_LEVELS: usize = 63;

/// Smallest power of two `>= 2*n*r`, capped at `2^62` (spec.md §4.5).
///
/// `n` and `r` must both be positive; this is enforced by
/// [`crate::config::WaveParams::validate`] before any caller reaches here.
pub fn modulo(n: i64, r: i64) -> i64 {
    debug_assert!(n > 0 && r > 0);
    let target = match n.checked_mul(2).and_then(|x| x.checked_mul(r)) {
        Some(t) => t,
        None => return 1i64 << 62,
    };
    for i in 0..63u32 {
        let m = 1i64 << i;
        if m >= target {
            return m;
        }
    }
    1i64 << 62
}

/// Number of levels `L = 1 + ceil(log2(2*E*N*r))`, capped at
/// [`MAX_LEVELS`] and floored at 1 (spec.md §2, §4.1).
pub fn num_levels(n: i64, epsilon: f64, r: i64) -> usize {
    debug_assert!(n > 0 && r > 0);
    let arg = 2.0 * epsilon * (n as f64) * (r as f64);
    let l = arg.log2().ceil().abs();
    let levels = 1.0 + l;
    if !levels.is_finite() || levels > MAX_LEVELS as f64 {
        MAX_LEVELS
    } else if levels < 1.0 {
        1
    } else {
        levels as usize
    }
}

/// Maximum live items per level queue: `ceil(1/E) + 1` (spec.md §2, §3 I6).
///
/// `epsilon == 0.0` is guarded to `0.01` to mirror the original's own
/// internal default, reachable only if a caller bypasses
/// [`crate::config::WaveParams::validate`].
pub fn level_capacity(epsilon: f64) -> usize {
    let e = if epsilon == 0.0 { 0.01 } else { epsilon };
    (1.0 / e).ceil() as usize + 1
}

/// The rank selector: the largest bit position `j` such that some multiple
/// of `2^j` lies in `(total, total+v]` — equivalently, the index of the
/// top bit in which `total` and `total+v` differ (spec.md §4.1).
///
/// Returns `0` whenever `num_levels <= 1`. The result is always clamped to
/// `[0, num_levels-1]`.
pub fn level_of(total: i64, v: i64, num_levels: usize) -> usize {
    if num_levels <= 1 {
        return 0;
    }
    let t = total as u64;
    let tv = t.wrapping_add(v as u64);
    let f = !t;
    let g = !tv;
    let h = f ^ g;
    let j = if h == 0 { 0 } else { 63 - h.leading_zeros() as usize };
    j.min(num_levels - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modulo_is_smallest_power_of_two_at_least_2nr() {
        assert_eq!(modulo(60, 1024), 131072); // 2*60*1024 = 122880 -> 2^17=131072
        assert_eq!(modulo(1, 1), 2); // 2*1*1=2 -> 2^1=2
        assert_eq!(modulo(1, 2), 4); // 2*1*2=4 -> 2^2=4
    }

    #[test]
    fn modulo_saturates_on_overflow() {
        assert_eq!(modulo(i64::MAX, i64::MAX), 1i64 << 62);
    }

    #[test]
    fn num_levels_matches_formula_and_is_capped() {
        assert_eq!(num_levels(60, 0.05, 1024), 1 + (2.0f64 * 0.05 * 60.0 * 1024.0).log2().ceil() as usize);
        assert!(num_levels(i64::MAX, 0.99, i64::MAX) <= MAX_LEVELS);
    }

    #[test]
    fn level_capacity_matches_ceil_inverse_plus_one() {
        assert_eq!(level_capacity(0.05), 21); // ceil(20)+1
        assert_eq!(level_capacity(1.0 / 3.0), 4); // ceil(3)+1
    }

    #[test]
    fn level_of_zero_levels_is_always_zero() {
        assert_eq!(level_of(0, 1, 0), 0);
        assert_eq!(level_of(1000, 7, 1), 0);
    }

    #[test]
    fn level_of_increments_that_cross_a_power_of_two_pick_that_bit() {
        // total=0, v=1: interval (0,1] contains 1=2^0 but nothing coarser -> level 0.
        assert_eq!(level_of(0, 1, 8), 0);
        // total=1, v=1: interval (1,2] contains 2=2^1 -> level 1.
        assert_eq!(level_of(1, 1, 8), 1);
        // total=3, v=1: interval (3,4] contains 4=2^2 -> level 2.
        assert_eq!(level_of(3, 1, 8), 2);
        // total=7, v=1: interval (7,8] contains 8=2^3 -> level 3.
        assert_eq!(level_of(7, 1, 8), 3);
    }

    #[test]
    fn level_of_is_clamped_to_num_levels_minus_one() {
        assert_eq!(level_of(0, 1 << 10, 3), 2);
    }
}
