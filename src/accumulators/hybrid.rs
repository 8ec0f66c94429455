//! Hybrid accumulator running both mean rules side by side

use crate::accumulators::exact_sum::{ExactSum, DEFAULT_MEAN_SCALE};
use crate::accumulators::guard::{self, Step, Tally};
use crate::math;
use crate::traits::{Accumulator, SequenceLimitExceeded};

/// Min/max/count plus two independent means: the incremental estimate and
/// the exact big-rational mean
///
/// Both update rules run on every accepted value. The two means are kept
/// apart on purpose so callers can watch them drift; [`divergence`] reports
/// the gap.
///
/// Not internally synchronized, like
/// [`IncrementalAccumulator`](crate::IncrementalAccumulator).
///
/// # Example
///
/// ```
/// use streamstat::HybridAccumulator;
///
/// let mut stats = HybridAccumulator::new();
/// for v in [f64::MAX, 0.0, f64::MAX, 0.0] {
///     stats.put_next(v).unwrap();
/// }
///
/// assert_eq!(stats.exact_mean(), f64::MAX / 2.0);
/// assert!(stats.incremental_mean().is_finite());
/// assert!(stats.is_degraded());
/// ```
///
/// [`divergence`]: HybridAccumulator::divergence
#[derive(Clone, Debug)]
pub struct HybridAccumulator {
    tally: Tally,
    mean: f64,
    sum: ExactSum,
    scale: u32,
    degraded: bool,
}

impl Default for HybridAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl HybridAccumulator {
    /// Create a new empty accumulator with the default mean scale
    pub fn new() -> Self {
        Self::with_scale(DEFAULT_MEAN_SCALE)
    }

    /// Create a new empty accumulator whose exact mean is rounded to
    /// `scale` decimal places
    pub fn with_scale(scale: u32) -> Self {
        Self {
            tally: Tally::new(),
            mean: f64::NAN,
            sum: ExactSum::new(),
            scale,
            degraded: false,
        }
    }

    /// Ingest one observation into both rules
    pub fn put_next(&mut self, value: f64) -> Result<(), SequenceLimitExceeded> {
        if !guard::is_observation(value) {
            return Ok(());
        }

        match self.tally.admit(value, self.mean.is_finite())? {
            Step::First => {
                self.mean = value;
                self.sum.reset(value);
            }
            Step::Reseeded => {
                self.mean = value;
                self.sum.add(value);
            }
            Step::Next { count } => {
                let (mean, scaled) = guard::incremental_step(self.mean, value, count);
                self.mean = mean;
                self.degraded |= scaled;
                self.sum.add(value);
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

    /// Number of accepted observations
    pub fn count(&self) -> u64 {
        self.tally.count()
    }

    /// Mean from the online recurrence, NaN when empty
    pub fn incremental_mean(&self) -> f64 {
        self.mean
    }

    /// Mean from the exact sum, NaN when empty
    pub fn exact_mean(&self) -> f64 {
        self.sum.mean(self.tally.count(), self.scale)
    }

    /// Absolute difference between the two means, NaN when empty
    pub fn divergence(&self) -> f64 {
        math::abs(self.incremental_mean() - self.exact_mean())
    }

    /// Whether the incremental rule ever used the scaled form
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Decimal places kept by [`exact_mean`](Self::exact_mean)
    pub fn scale(&self) -> u32 {
        self.scale
    }
}

impl Accumulator for HybridAccumulator {
    fn put_next(&mut self, value: f64) -> Result<(), SequenceLimitExceeded> {
        HybridAccumulator::put_next(self, value)
    }

    fn min(&self) -> f64 {
        self.tally.min
    }

    fn max(&self) -> f64 {
        self.tally.max
    }

    /// The exact mean
    fn mean(&self) -> f64 {
        self.exact_mean()
    }

    fn count(&self) -> u64 {
        self.tally.count()
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>() + self.sum.size_bytes()
    }
}
