//! # Streamstat
//!
//! Single-pass streaming statistics for Rust.
//!
//! Streamstat keeps a running minimum, maximum, count and arithmetic mean over
//! an unbounded stream of `f64` observations, one value at a time, without
//! ever storing the stream.
//!
//! ## Accumulators
//!
//! - [`IncrementalAccumulator`]: online mean update, O(1) everything, loses
//!   precision on very long or magnitude-skewed streams
//! - [`ExactAccumulator`]: exact big-rational sum divided on read; thread-safe
//!   ingestion, slower writes and reads
//! - [`HybridAccumulator`]: both update rules in one instance, with both means
//!   exposed for cross-validation
//!
//! ## Quick Start
//!
//! ```rust
//! use streamstat::prelude::*;
//!
//! let mut stats = IncrementalAccumulator::new();
//! for latency_ms in [12.0, 7.5, f64::NAN, 30.25] {
//!     stats.put_next(latency_ms).unwrap();
//! }
//!
//! // NaN is discarded silently
//! assert_eq!(stats.count(), 3);
//! assert_eq!(stats.min(), 7.5);
//! assert_eq!(stats.max(), 30.25);
//! ```
//!
//! ## Choosing a Variant
//!
//! ```rust
//! use streamstat::prelude::*;
//!
//! let mut hybrid = HybridAccumulator::new();
//! for v in [0.1, 0.2, 0.3] {
//!     hybrid.put_next(v).unwrap();
//! }
//!
//! // The exact mean is the correctly rounded value of (0.1 + 0.2 + 0.3) / 3
//! // over the binary values actually received.
//! assert!(hybrid.divergence() < 1e-15);
//! ```
//!
//! ## Empty State
//!
//! Until the first finite value arrives, `min`, `max` and `mean` return NaN.
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support
//! - `exact` (default): [`ExactAccumulator`] and [`HybridAccumulator`]
//!   (requires `std`)
//! - `serde`: Serialize [`Summary`](traits::Summary)
//! - `full`: Enable everything
//!
//! Without `std`, only [`IncrementalAccumulator`] is available and math goes
//! through `libm`.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod traits;

pub mod accumulators;

mod math;

pub mod prelude {
    pub use crate::traits::*;

    pub use crate::accumulators::IncrementalAccumulator;

    #[cfg(feature = "exact")]
    pub use crate::accumulators::{ExactAccumulator, HybridAccumulator};
}

pub use accumulators::IncrementalAccumulator;

#[cfg(feature = "exact")]
pub use accumulators::{ExactAccumulator, HybridAccumulator};

pub use traits::{Accumulator, SequenceLimitExceeded, Summary};
