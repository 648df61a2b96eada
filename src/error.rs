//! Domain-level errors surfaced by the wave core.
//!
//! Silent no-ops (stale timestamps, zero increments, out-of-band queries)
//! are not represented here — they are not errors. See [`crate::wave::Admission`].

/// Errors surfaced by [`crate::config::WaveParams`] validation and by
/// [`crate::wave::Wave`]'s public entrypoints.
#[derive(Debug, thiserror::Error)]
pub enum WaveError {
    #[error("window length N must be positive (got {0})")]
    InvalidWindow(i64),

    #[error("relative error E must lie in (0,1) (got {0})")]
    InvalidError(f64),

    #[error("value bound R must be positive or -1 for the default (got {0})")]
    InvalidBound(i64),

    #[error("increment {v} exceeds the configured bound R={r}")]
    ValueExceedsBound { v: i64, r: i64 },

    #[error("increment must be non-negative (got {0})")]
    NegativeValue(i64),

    #[error("timestamp must be non-negative (got {0})")]
    InvalidTimestamp(i64),

    #[error("out of memory growing the wave's arena")]
    Oom,
}

pub type Result<T> = std::result::Result<T, WaveError>;
