//! Wave construction parameters: validation and documented defaults.
//!
//! Mirrors the five knobs spec.md §6 lists for `create`/`resize`: window
//! length, relative error, value bound, construction timestamp, and the
//! auto-expire flag. Only the *parameters* are serializable — the live
//! triples never are (spec.md §1 Non-goals).

use serde::{Deserialize, Serialize};

use crate::error::{Result, WaveError};

/// Sentinel for "R unset" on the wire, matching the original command
/// surface's own `-1` convention (spec.md §6, §4.5).
pub const UNSET_R: i64 = -1;

/// Construction/resize parameters for a [`crate::wave::Wave`].
///
/// # Defaults
/// `N = 60`, `epsilon = 0.05`, `r = -1` (meaning: computed from `N` as
/// `i64::MAX / N`), `ts = None` (caller must supply the current
/// monotonic-seconds timestamp at construction time), `auto_expire = true`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveParams {
    /// Window length, in the same units as timestamps. Must be > 0.
    pub n: i64,
    /// Relative error rate ε. Must lie in (0, 1).
    pub epsilon: f64,
    /// Per-item value bound R, or [`UNSET_R`] to derive it from `n`.
    pub r: i64,
    /// Construction timestamp. `None` means "caller supplies `now` explicitly".
    #[serde(skip)]
    pub ts: Option<i64>,
    /// Whether the host should auto-expire the key one unit past `last + n`.
    /// Carried for parity with spec.md §6; the core itself never expires keys
    /// (that is the host's job, out of scope per spec.md §1).
    pub auto_expire: bool,
}

impl Default for WaveParams {
    fn default() -> Self {
        WaveParams { n: 60, epsilon: 0.05, r: UNSET_R, ts: None, auto_expire: true }
    }
}

impl WaveParams {
    /// The largest increment value a stream of window length `n` can absorb
    /// without overflowing the running sum's domain (spec.md §4.5, §6).
    #[inline]
    pub fn max_increment(n: i64) -> i64 {
        i64::MAX / n
    }

    /// The effective value bound: `r` if set, else [`Self::max_increment`].
    #[inline]
    pub fn effective_r(&self) -> i64 {
        if self.r == UNSET_R {
            Self::max_increment(self.n)
        } else {
            self.r
        }
    }

    /// Validates the input-domain rules from spec.md §7.
    ///
    /// `v < 0`, `N <= 0`, `E` outside `(0,1)`, and `R < -1` are caller
    /// errors; they do not mutate any wave.
    pub fn validate(&self) -> Result<()> {
        if self.n <= 0 {
            return Err(WaveError::InvalidWindow(self.n));
        }
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(WaveError::InvalidError(self.epsilon));
        }
        if self.r < UNSET_R || self.r == 0 {
            return Err(WaveError::InvalidBound(self.r));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        WaveParams::default().validate().unwrap();
    }

    #[test]
    fn rejects_nonpositive_window() {
        let p = WaveParams { n: 0, ..WaveParams::default() };
        assert!(matches!(p.validate(), Err(WaveError::InvalidWindow(0))));
    }

    #[test]
    fn rejects_error_out_of_range() {
        for bad in [0.0, 1.0, -0.1, 1.5] {
            let p = WaveParams { epsilon: bad, ..WaveParams::default() };
            assert!(p.validate().is_err(), "epsilon={bad} should be rejected");
        }
    }

    #[test]
    fn rejects_bad_bound() {
        let p = WaveParams { r: -2, ..WaveParams::default() };
        assert!(p.validate().is_err());
        let p = WaveParams { r: 0, ..WaveParams::default() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn unset_bound_resolves_to_max_increment() {
        let p = WaveParams { n: 100, r: UNSET_R, ..WaveParams::default() };
        assert_eq!(p.effective_r(), i64::MAX / 100);
    }

    #[test]
    fn explicit_bound_is_kept() {
        let p = WaveParams { r: 1024, ..WaveParams::default() };
        assert_eq!(p.effective_r(), 1024);
    }
}
