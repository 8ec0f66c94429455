//! Fast incremental-mean accumulator
//!
//! Keeps the mean with the online recurrence
//! `mean(n) = mean(n - 1) + (x - mean(n - 1)) / n`, which never builds a
//! running sum and therefore never overflows, at the cost of rounding error
//! that compounds over very long streams.

use crate::accumulators::guard::{self, Step, Tally};
use crate::traits::{Accumulator, SequenceLimitExceeded};

/// Running min/max/count/mean with O(1) time and space per observation
///
/// Values whose magnitude, or whose running mean's magnitude, exceeds
/// `f64::MAX / 2` go through a scaled update that divides both operands by
/// the count before subtracting. That keeps the mean finite for streams like
/// `MAX, -MAX, MAX, ...` but loses precision; [`is_degraded`] reports whether
/// it ever happened.
///
/// # Thread Safety
///
/// Not internally synchronized. `put_next` takes `&mut self`, so callers
/// serialize ingestion themselves (e.g. `Mutex<IncrementalAccumulator>`).
///
/// # Example
///
/// ```
/// use streamstat::{Accumulator, IncrementalAccumulator};
///
/// let mut stats = IncrementalAccumulator::new();
/// for v in [1.0, 2.0, 3.0] {
///     stats.put_next(v).unwrap();
/// }
/// assert_eq!(stats.mean(), 2.0);
///
/// for v in [4.0, 5.0, 6.0] {
///     stats.put_next(v).unwrap();
/// }
/// assert_eq!(stats.min(), 1.0);
/// assert_eq!(stats.max(), 6.0);
/// assert_eq!(stats.mean(), 3.5);
/// ```
///
/// [`is_degraded`]: IncrementalAccumulator::is_degraded
#[derive(Clone, Debug)]
pub struct IncrementalAccumulator {
    tally: Tally,
    /// Running mean, NaN until the first observation
    mean: f64,
    /// Set once any update used the scaled form
    degraded: bool,
}

impl Default for IncrementalAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalAccumulator {
    /// Create a new empty accumulator
    pub fn new() -> Self {
        Self {
            tally: Tally::new(),
            mean: f64::NAN,
            degraded: false,
        }
    }

    /// Ingest one observation
    ///
    /// NaN and infinities are ignored. Fails once `i64::MAX` observations have
    /// been accepted; the state is left untouched in that case.
    pub fn put_next(&mut self, value: f64) -> Result<(), SequenceLimitExceeded> {
        if !guard::is_observation(value) {
            return Ok(());
        }

        match self.tally.admit(value, self.mean.is_finite())? {
            Step::First | Step::Reseeded => self.mean = value,
            Step::Next { count } => {
                let (mean, scaled) = guard::incremental_step(self.mean, value, count);
                self.mean = mean;
                self.degraded |= scaled;
            }
        }
        Ok(())
    }

    /// Smallest accepted value, NaN when empty
    pub fn min(&self) -> f64 {
        self.tally.min
    }

    /// Largest accepted value, NaN when empty
    pub fn max(&self) -> f64 {
        self.tally.max
    }

    /// Running mean, NaN when empty
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Number of accepted observations
    pub fn count(&self) -> u64 {
        self.tally.count()
    }

    /// Whether any update had to use the scaled (lower precision) form
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

impl Accumulator for IncrementalAccumulator {
    fn put_next(&mut self, value: f64) -> Result<(), SequenceLimitExceeded> {
        IncrementalAccumulator::put_next(self, value)
    }

    fn min(&self) -> f64 {
        self.tally.min
    }

    fn max(&self) -> f64 {
        self.tally.max
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    fn count(&self) -> u64 {
        self.tally.count()
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulators::guard::COUNT_LIMIT;

    #[test]
    fn test_empty() {
        let stats = IncrementalAccumulator::new();

        assert!(stats.is_empty());
        assert_eq!(stats.count(), 0);
        assert!(stats.min().is_nan());
        assert!(stats.max().is_nan());
        assert!(stats.mean().is_nan());
        assert!(!stats.is_degraded());
    }

    #[test]
    fn test_single_value() {
        let mut stats = IncrementalAccumulator::new();
        stats.put_next(42.0).unwrap();

        assert_eq!(stats.count(), 1);
        assert_eq!(stats.min(), 42.0);
        assert_eq!(stats.max(), 42.0);
        assert_eq!(stats.mean(), 42.0);
    }

    #[test]
    fn test_nan_is_discarded() {
        let mut stats = IncrementalAccumulator::new();

        stats.put_next(0.0).unwrap();
        assert_eq!(stats.max(), 0.0);
        assert_eq!(stats.min(), 0.0);
        assert_eq!(stats.mean(), 0.0);

        stats.put_next(f64::NAN).unwrap();
        assert_eq!(stats.max(), 0.0);
        assert_eq!(stats.min(), 0.0);
        assert_eq!(stats.mean(), 0.0);

        stats.put_next(-10.0).unwrap();
        assert_eq!(stats.max(), 0.0);
        assert_eq!(stats.min(), -10.0);
        assert_eq!(stats.mean(), -5.0);
        assert_eq!(stats.count(), 2);
    }

    #[test]
    fn test_infinity_is_discarded() {
        let mut stats = IncrementalAccumulator::new();

        stats.put_next(f64::INFINITY).unwrap();
        stats.put_next(f64::NEG_INFINITY).unwrap();
        assert!(stats.is_empty());
        assert!(stats.mean().is_nan());

        stats.put_next(1.0).unwrap();
        stats.put_next(f64::INFINITY).unwrap();
        stats.put_next(2.0).unwrap();
        assert_eq!(stats.count(), 2);
        assert_eq!(stats.max(), 2.0);
        assert_eq!(stats.mean(), 1.5);
    }

    #[test]
    fn test_arithmetic_progression() {
        let mut stats = IncrementalAccumulator::new();
        for v in [
            700.0, 900.0, 1100.0, 1300.0, 1700.0, 1900.0, 2300.0, 2900.0, 3100.0, 3700.0, 4100.0,
            4300.0, 4700.0, 5300.0, 5900.0, 6100.0,
        ] {
            stats.put_next(v).unwrap();
        }

        // True mean is 3125; the recurrence lands within an ulp or so of it
        assert!((stats.mean() - 3125.0).abs() <= 1e-12);
        assert!(!stats.is_degraded());
    }

    #[test]
    fn test_limit_reached() {
        let mut stats = IncrementalAccumulator::new();
        stats.put_next(1.0).unwrap();
        stats.tally.count = COUNT_LIMIT - 1;

        stats.put_next(i64::MAX as f64).unwrap();
        assert_eq!(stats.mean(), 2.0);
        assert_eq!(stats.count(), i64::MAX as u64);

        let err = stats.put_next(1.0).unwrap_err();
        assert_eq!(err.limit, i64::MAX as u64);
        assert_eq!(stats.count(), i64::MAX as u64);
        assert_eq!(stats.mean(), 2.0);
        assert_eq!(stats.min(), 1.0);

        // Stays fatal
        assert!(stats.put_next(5.0).is_err());
        assert_eq!(stats.count(), i64::MAX as u64);
    }

    #[test]
    fn test_limit_ignores_nan_first() {
        let mut stats = IncrementalAccumulator::new();
        stats.put_next(1.0).unwrap();
        stats.tally.count = COUNT_LIMIT;

        // Validation runs before the overflow guard
        assert!(stats.put_next(f64::NAN).is_ok());
        assert!(stats.put_next(1.0).is_err());
    }

    #[test]
    fn test_negative_counter_restarts() {
        let mut stats = IncrementalAccumulator::new();
        stats.put_next(100.0).unwrap();
        stats.put_next(200.0).unwrap();
        stats.tally.count = -3;

        stats.put_next(7.0).unwrap();
        assert_eq!(stats.count(), 1);
        assert_eq!(stats.min(), 7.0);
        assert_eq!(stats.max(), 7.0);
        assert_eq!(stats.mean(), 7.0);
    }

    #[test]
    fn test_corrupted_mean_reseeds() {
        let mut stats = IncrementalAccumulator::new();
        stats.put_next(1.0).unwrap();
        stats.put_next(3.0).unwrap();
        stats.mean = f64::NAN;

        stats.put_next(10.0).unwrap();
        assert_eq!(stats.count(), 3);
        assert_eq!(stats.mean(), 10.0);
        assert_eq!(stats.min(), 10.0);
        assert_eq!(stats.max(), 10.0);

        stats.put_next(20.0).unwrap();
        assert_eq!(stats.min(), 10.0);
        assert_eq!(stats.max(), 20.0);
    }

    #[test]
    fn test_corrupted_extreme_reseeds() {
        let mut stats = IncrementalAccumulator::new();
        stats.put_next(1.0).unwrap();
        stats.put_next(3.0).unwrap();
        stats.tally.min = f64::NEG_INFINITY;

        stats.put_next(4.0).unwrap();
        assert_eq!(stats.min(), 4.0);
        assert_eq!(stats.mean(), 4.0);
    }

    #[test]
    fn test_alternating_extremes() {
        let mut stats = IncrementalAccumulator::new();
        for _ in 0..1_000_000 {
            stats.put_next(f64::MAX).unwrap();
            stats.put_next(-f64::MAX).unwrap();
        }

        assert_eq!(stats.max(), f64::MAX);
        assert_eq!(stats.min(), -f64::MAX);
        assert!(stats.mean().is_finite());
        assert!(
            stats.mean().abs() / f64::MAX <= 1e-15,
            "mean {:e} drifted from 0",
            stats.mean()
        );
        assert!(stats.is_degraded());
    }

    #[test]
    fn test_big_plus_small() {
        let mut stats = IncrementalAccumulator::new();
        for i in 0..1_000_000 {
            stats.put_next(f64::MAX).unwrap();
            stats.put_next(i as f64).unwrap();
        }

        // The scaled path costs a few decimal digits here
        let expected = f64::MAX / 2.0;
        let relative_error = (stats.mean() - expected).abs() / expected;
        assert!(stats.is_degraded());
        assert!(
            relative_error <= 1e-12,
            "expected {:e}, got {:e}, relative error {:e}",
            expected,
            stats.mean(),
            relative_error
        );
    }

    #[test]
    fn test_ramp_to_max() {
        let n = 1_000_000;
        let step = f64::MAX / n as f64;
        let mut stats = IncrementalAccumulator::new();
        for i in 0..n {
            stats.put_next(i as f64 * step).unwrap();
        }

        let expected = step * (n - 1) as f64 / 2.0;
        assert_ne!(stats.mean(), f64::MAX);
        let relative_error = (stats.mean() - expected).abs() / expected;
        assert!(
            relative_error <= 1e-6,
            "expected {:e}, got {:e}, relative error {:e}",
            expected,
            stats.mean(),
            relative_error
        );
    }

    #[test]
    fn test_put_all_and_summary() {
        let mut stats = IncrementalAccumulator::new();
        stats.put_all([2.0, f64::NAN, 4.0, 6.0]).unwrap();

        let summary = stats.summary();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 6.0);
        assert_eq!(summary.mean, 4.0);
        assert!(summary.contains(stats.mean()));
    }
}
