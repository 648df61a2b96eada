//! The wave: scalar state, insert, query, resize, reset (spec.md §4).
//!
//! `Wave` is the single orchestrator type exposing the five external
//! operations spec.md §6 lists (`create` is [`Wave::new`], `destroy` is
//! ordinary `Drop` — every triple lives in [`Wave`]'s own [`Arena`], so
//! dropping a `Wave` frees them all with no further bookkeeping).

use serde::Serialize;

use crate::config::WaveParams;
use crate::error::{Result, WaveError};
use crate::item::WaveItem;
use crate::level;
use crate::list::{Arena, Link, ListHandle};

/// Outcome of a successful call to [`Wave::set`]. Not an error type: a
/// silent no-op (spec.md §4.2, §7) is a normal, successful result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The increment was admitted and now lives in the structure.
    Admitted,
    /// The increment was silently absorbed without mutating the wave
    /// (stale timestamp, zero value, or an unset timestamp sentinel).
    Rejected,
}

/// A sliding-window approximate-sum summary over a stream of non-negative
/// integer increments (spec.md §2).
///
/// Mutated only by [`Wave::set`], [`Wave::resize`], and [`Wave::reset`];
/// read only by [`Wave::get`]. No background work, no interior
/// synchronization — the host is responsible for serializing access to a
/// given instance (spec.md §5).
pub struct Wave {
    n: i64,
    epsilon: f64,
    r: i64,
    auto_expire: bool,

    m: i64,
    start: i64,
    last: i64,
    pos: i64,
    total: i64,
    z: i64,

    num_levels: usize,
    level_cap: usize,

    arena: Arena<WaveItem>,
    global: ListHandle,
    levels: Vec<ListHandle>,
}

/// Current monotonic-ish wall clock, in whole seconds, used as the
/// fallback when a caller does not supply one. Mirrors the host's
/// monotonic clock collaborator (spec.md §1), out of scope to re-specify.
pub fn now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as i64).unwrap_or(0)
}

impl Wave {
    /// Creates a new wave (spec.md §6 `create`).
    pub fn new(params: WaveParams) -> Result<Wave> {
        params.validate()?;
        let r = params.effective_r();
        let ts = params.ts.unwrap_or_else(now);
        let m = level::modulo(params.n, r);
        let num_levels = level::num_levels(params.n, params.epsilon, r);
        let level_cap = level::level_capacity(params.epsilon);

        Ok(Wave {
            n: params.n,
            epsilon: params.epsilon,
            r,
            auto_expire: params.auto_expire,
            m,
            start: ts,
            last: ts,
            pos: 0,
            total: 0,
            z: 0,
            num_levels,
            level_cap,
            arena: Arena::new(),
            global: ListHandle::new(),
            levels: vec![ListHandle::new(); num_levels],
        })
    }

    /// The raw running total (spec.md §6, `wvtotal`'s host-side reply).
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Whether the host should auto-expire this key past `last + n`
    /// (spec.md §6); the core itself never expires keys.
    pub fn auto_expire(&self) -> bool {
        self.auto_expire
    }

    pub fn window(&self) -> i64 {
        self.n
    }

    pub fn epsilon_value(&self) -> f64 {
        self.epsilon
    }

    pub fn bound(&self) -> i64 {
        self.r
    }

    pub fn last_ts(&self) -> i64 {
        self.last
    }

    /// Admits one increment `v` at timestamp `ts` (spec.md §4.2).
    ///
    /// Input-domain violations (`v < 0`, `ts < 0`, `v` greater than the
    /// configured bound) are rejected with [`WaveError`] and never touch
    /// the wave. `v == 0`, an unset timestamp (`ts == 0`), and a
    /// timestamp older than `start` are silently absorbed no-ops
    /// (spec.md §4.2, §7) — they return `Ok(Admission::Rejected)`.
    pub fn set(&mut self, v: i64, ts: i64) -> Result<Admission> {
        if v < 0 {
            return Err(WaveError::NegativeValue(v));
        }
        if ts < 0 {
            return Err(WaveError::InvalidTimestamp(ts));
        }
        if v > self.r {
            return Err(WaveError::ValueExceedsBound { v, r: self.r });
        }
        if v == 0 || ts == 0 || ts < self.start {
            return Ok(Admission::Rejected);
        }

        // Pre-flight the one allocation this call might need, so that a
        // failure here never leaves the wave partially mutated (spec.md §7:
        // "every operation either completes and restores invariants or
        // returns before any mutation").
        self.arena.reserve_one().map_err(|_| WaveError::Oom)?;

        // 1. Timestamp step.
        if ts > self.last && ts > self.start {
            self.pos = (ts - self.start).rem_euclid(self.m);
            self.last = ts;
        }

        // 2. Expire old.
        self.expire_stale();

        // 3. Admit: determine the level, then fold v into total.
        let j = level::level_of(self.total, v, self.num_levels);
        self.total += v;

        // 4. Level capacity: evict the level's tail if it was already full.
        self.evict_level_overflow(j);

        // 5. Link the new item at the head of l[j] and the tail of L.
        let z_mod = self.total.rem_euclid(self.m);
        let item = WaveItem { pos: self.pos, v, z: z_mod, level: j };
        let idx = self.arena.try_insert(item).map_err(|_| WaveError::Oom)?;
        self.levels[j].push_head(&mut self.arena, Link::Level, idx);
        self.global.push_tail(&mut self.arena, Link::Global, idx);

        tracing::debug!(pos = self.pos, v, level = j, total = self.total, "admitted increment");
        Ok(Admission::Admitted)
    }

    fn expire_stale(&mut self) {
        let mut expired = 0usize;
        while let Some(head_idx) = self.global.head() {
            let head = *self.arena.get(head_idx);
            if head.pos > self.pos - self.n {
                break;
            }
            self.z = head.z;
            self.levels[head.level].unlink(&mut self.arena, Link::Level, head_idx);
            self.global.unlink(&mut self.arena, Link::Global, head_idx);
            crate::list::finish_remove(&mut self.arena, head_idx);
            expired += 1;
        }
        if expired > 0 {
            tracing::debug!(expired, z = self.z, "expired stale items from head of L");
        }
    }

    fn evict_level_overflow(&mut self, j: usize) {
        // Checked against the count the level queue is *about* to reach once
        // the new item below is linked in, not the count before it — so the
        // queue never transiently holds `level_cap + 1` items (spec.md §4.2
        // step 4, I6).
        if self.levels[j].len() + 1 > self.level_cap {
            if let Some(tail_idx) = self.levels[j].pop_tail(&mut self.arena, Link::Level) {
                self.global.unlink(&mut self.arena, Link::Global, tail_idx);
                crate::list::finish_remove(&mut self.arena, tail_idx);
                tracing::trace!(level = j, "evicted level-capacity overflow item");
            }
        }
    }

    /// Approximates the sum of increments admitted in `(ts - n, ts]`
    /// (spec.md §4.3).
    ///
    /// `fast` selects the O(1) midpoint estimator (error bounded by
    /// `epsilon * n * r`); otherwise a traversal of `L` refines the
    /// answer, still approximate because items evicted by level-capacity
    /// (not by expiration) are no longer visible.
    ///
    /// Past-query position comparisons are only meaningful across a
    /// single modulus wrap (spec.md §9 Open Question 3) — behavior
    /// across more than one wrap is unspecified, matching the source
    /// this was distilled from.
    pub fn get(&self, ts: i64, fast: bool) -> i64 {
        // 1. Out of range.
        if ts < self.start || ts <= self.last - self.n || ts >= self.last + self.n {
            return 0;
        }

        // 2. Exact boundary cases.
        if ts == self.last {
            return self.total - self.z;
        }
        if self.global.is_empty() {
            return 0;
        }

        // 3. Advance a cursor to the first item with pos >= ts - n.
        let mut iter = self.global.iter(&self.arena, Link::Global);
        let mut h = iter.next().expect("global list is non-empty");
        while self.arena.get(h).pos < ts - self.n {
            match iter.next() {
                Some(next) => h = next,
                None => break,
            }
        }
        let head = *self.arena.get(h);
        let p = head.pos;
        let v2 = head.v;
        let z2 = head.z;
        let z1 = self.z;

        // 4. More exact boundaries.
        if p == ts - self.n + 1 {
            return self.total - z2 + v2;
        }
        if p == ts - self.n {
            return self.total - z2;
        }
        if ts == self.pos {
            return self.total - self.z;
        }

        // 5. Fast estimator: midpoint of [total - z2 + v2, total - z1].
        if fast {
            return self.total - (z1 + z2 - v2) / 2;
        }

        // 6. Refined traversal.
        if ts < self.last {
            // Past query: sum items that lie *after* the queried window and
            // subtract them from the running total.
            let mut future_total = 0i64;
            let limit = (ts - self.start).rem_euclid(self.m);
            for idx in self.global.iter(&self.arena, Link::Global).rev() {
                let it = self.arena.get(idx);
                if it.pos <= limit {
                    future_total += it.v;
                }
            }
            self.total - future_total
        } else {
            // Future query: sum items whose position lies inside the window.
            // Truncating `%`, not `rem_euclid`: `ts - start - n` is routinely
            // negative here (any future query before the wave has lived a
            // full window), and the original's `WAVE_MODULO_OBJ` macro is a
            // plain C `%`, which keeps the dividend's sign rather than
            // wrapping into `[0, M)`.
            let mut win_total = 0i64;
            let limit = (ts - self.start - self.n) % self.m;
            for idx in self.global.iter(&self.arena, Link::Global) {
                let it = self.arena.get(idx);
                if it.pos > limit {
                    win_total += it.v;
                }
            }
            win_total
        }
    }

    /// Purges every triple and re-parameterizes the wave (spec.md §4.4
    /// `resize`).
    ///
    /// `total`, `z`, `pos`, `start`, and `last` are left untouched even
    /// though every triple they were computed from is discarded — this is
    /// the source's own documented semantics (spec.md §9 Open Question
    /// 2), not a bug this crate fixes. Callers that want a fully clean
    /// slate should call [`Wave::reset`] instead.
    pub fn resize(&mut self, params: WaveParams) -> Result<()> {
        params.validate()?;
        self.purge();

        self.n = params.n;
        self.epsilon = params.epsilon;
        self.r = params.effective_r();
        self.auto_expire = params.auto_expire;
        self.m = level::modulo(self.n, self.r);
        self.num_levels = level::num_levels(self.n, self.epsilon, self.r);
        self.level_cap = level::level_capacity(self.epsilon);
        self.levels = vec![ListHandle::new(); self.num_levels];
        Ok(())
    }

    /// Purges every triple and zeroes the running counters, restarting
    /// the clock at `now` (spec.md §4.4 `reset`).
    pub fn reset(&mut self, now: i64) {
        self.purge();
        self.pos = 0;
        self.total = 0;
        self.z = 0;
        self.start = now;
        self.last = now;
    }

    fn purge(&mut self) {
        let discarded = self.global.len();
        self.arena = Arena::new();
        self.global = ListHandle::new();
        for lv in &mut self.levels {
            *lv = ListHandle::new();
        }
        if discarded > 0 {
            tracing::warn!(discarded, "purged a non-empty wave's lists");
        }
    }

    /// A point-in-time snapshot of scalar state and (optionally) every
    /// live triple, for introspection (spec.md §6 `wvdebug`'s data, minus
    /// the reply encoding, which is the host's job and out of scope).
    pub fn debug_snapshot(&self, verbose: bool) -> WaveSnapshot {
        WaveSnapshot {
            n: self.n,
            epsilon: self.epsilon,
            r: self.r,
            m: self.m,
            start: self.start,
            last: self.last,
            pos: self.pos,
            total: self.total,
            z: self.z,
            num_levels: self.num_levels,
            level_capacity: self.level_cap,
            level_lengths: self.levels.iter().map(|l| l.len()).collect(),
            global_len: self.global.len(),
            items: verbose.then(|| {
                self.global
                    .iter(&self.arena, Link::Global)
                    .map(|idx| {
                        let it = self.arena.get(idx);
                        (it.pos, it.v, it.z)
                    })
                    .collect()
            }),
        }
    }
}

/// Introspection snapshot returned by [`Wave::debug_snapshot`].
#[derive(Debug, Clone, Serialize)]
pub struct WaveSnapshot {
    pub n: i64,
    pub epsilon: f64,
    pub r: i64,
    pub m: i64,
    pub start: i64,
    pub last: i64,
    pub pos: i64,
    pub total: i64,
    pub z: i64,
    pub num_levels: usize,
    pub level_capacity: usize,
    pub level_lengths: Vec<usize>,
    pub global_len: usize,
    pub items: Option<Vec<(i64, i64, i64)>>,
}
