//! Streaming min/max/count/mean accumulators
//!
//! Three interchangeable strategies behind the [`Accumulator`] trait:
//!
//! - [`IncrementalAccumulator`]: online mean, O(1) per value, approximate
//! - [`ExactAccumulator`]: exact big-rational sum, mutex-serialized ingestion
//! - [`HybridAccumulator`]: both rules at once, both means exposed
//!
//! All of them discard NaN and infinite input silently, fail with
//! [`SequenceLimitExceeded`] once the counter is exhausted, and report NaN
//! for min/max/mean until the first value arrives.
//!
//! # Example
//!
//! ```
//! use streamstat::accumulators::IncrementalAccumulator;
//! use streamstat::traits::Accumulator;
//!
//! let mut stats = IncrementalAccumulator::new();
//! stats.put_all([3.0, 1.0, 2.0]).unwrap();
//!
//! let summary = stats.summary();
//! assert_eq!(summary.count, 3);
//! assert_eq!(summary.mean, 2.0);
//! ```
//!
//! [`Accumulator`]: crate::traits::Accumulator
//! [`SequenceLimitExceeded`]: crate::traits::SequenceLimitExceeded

mod guard;
mod incremental;

#[cfg(feature = "exact")]
mod exact;
#[cfg(feature = "exact")]
mod exact_sum;
#[cfg(feature = "exact")]
mod hybrid;

pub use incremental::IncrementalAccumulator;

#[cfg(feature = "exact")]
#[cfg_attr(docsrs, doc(cfg(feature = "exact")))]
pub use exact::ExactAccumulator;

#[cfg(feature = "exact")]
pub use exact_sum::DEFAULT_MEAN_SCALE;

#[cfg(feature = "exact")]
#[cfg_attr(docsrs, doc(cfg(feature = "exact")))]
pub use hybrid::HybridAccumulator;
