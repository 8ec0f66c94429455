//! Core traits for streaming accumulators
//!
//! All accumulators implement [`Accumulator`]. The only error any of them can
//! return is [`SequenceLimitExceeded`].

use core::fmt::Debug;

/// The observation counter has reached its limit (`i64::MAX`)
///
/// Fatal to the instance: the counter stays at the limit, every later
/// ingestion fails the same way, and min/max/mean stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceLimitExceeded {
    /// The counter value at which ingestion stopped
    pub limit: u64,
}

impl core::fmt::Display for SequenceLimitExceeded {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "sequence length limit of {} observations reached", self.limit)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SequenceLimitExceeded {}

/// Point-in-time view of an accumulator
///
/// Fields carry the NaN sentinel while `count == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Summary {
    /// Number of accepted observations
    pub count: u64,
    /// Smallest accepted value
    pub min: f64,
    /// Largest accepted value
    pub max: f64,
    /// Arithmetic mean of accepted values
    pub mean: f64,
}

impl Summary {
    /// Summary of an accumulator that has seen nothing
    pub fn empty() -> Self {
        Self {
            count: 0,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
        }
    }

    /// Check if a value falls within `[min, max]`
    ///
    /// Always false for an empty summary.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Spread of accepted values (max - min), NaN when empty
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Check if no observation has been accepted
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Core trait for all streaming accumulators
pub trait Accumulator: Debug {
    /// Ingest one observation
    ///
    /// NaN and infinite values are discarded without touching any statistic.
    /// Fails only once the counter has reached its limit.
    fn put_next(&mut self, value: f64) -> Result<(), SequenceLimitExceeded>;

    /// Smallest accepted value, NaN when empty
    fn min(&self) -> f64;

    /// Largest accepted value, NaN when empty
    fn max(&self) -> f64;

    /// Arithmetic mean of accepted values, NaN when empty
    fn mean(&self) -> f64;

    /// Number of accepted observations
    fn count(&self) -> u64;

    /// Memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Check if nothing has been accepted yet
    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Ingest every value of an iterator, stopping at the first error
    fn put_all<I>(&mut self, values: I) -> Result<(), SequenceLimitExceeded>
    where
        I: IntoIterator<Item = f64>,
        Self: Sized,
    {
        for value in values {
            self.put_next(value)?;
        }
        Ok(())
    }

    /// Current statistics as one value
    fn summary(&self) -> Summary {
        if self.is_empty() {
            return Summary::empty();
        }
        Summary {
            count: self.count(),
            min: self.min(),
            max: self.max(),
            mean: self.mean(),
        }
    }
}
