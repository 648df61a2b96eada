//! A deterministic sliding-window approximate-sum sketch.
//!
//! Maintains, for a stream of timestamped non-negative integer increments,
//! an approximate answer to "what is the sum of increments admitted in the
//! last `N` time units?" in `O(log(epsilon*N*R))` space per level and `O(1)`
//! amortized work per increment, trading exactness for a relative-error
//! guarantee bounded by `epsilon`.
//!
//! The wave itself never reads a clock, never expires keys on a timer, and
//! never talks to a network: all of that is the host's job. This crate is
//! the core data structure plus the arithmetic around it — construct a
//! [`Wave`], feed it `set` calls, read it back with `get`.
//!
//! ```
//! use wavesketch::{Wave, WaveParams};
//!
//! let mut w = Wave::new(WaveParams { n: 60, epsilon: 0.05, r: 1_000_000, ts: Some(1000), auto_expire: true }).unwrap();
//! w.set(10, 1000).unwrap();
//! w.set(25, 1030).unwrap();
//! assert_eq!(w.get(1030, false), 35);
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod item;
pub mod level;
pub mod list;
pub mod wave;

pub use config::{WaveParams, UNSET_R};
pub use error::{Result, WaveError};
pub use item::WaveItem;
pub use wave::{now, Admission, Wave, WaveSnapshot};
