//! Validation, overflow and corruption guards shared by every accumulator
//!
//! [`Tally`] owns the counter and the extremes. Each accumulator asks it to
//! admit a value and then applies its own mean/sum rule depending on the
//! returned [`Step`].

use crate::math;
use crate::traits::SequenceLimitExceeded;

/// Largest value the observation counter can hold
pub(crate) const COUNT_LIMIT: i64 = i64::MAX;

/// Magnitude above which the plain incremental update may overflow
pub(crate) const SCALE_THRESHOLD: f64 = f64::MAX / 2.0;

/// Whether a value may enter an accumulator at all
#[inline]
pub(crate) fn is_observation(value: f64) -> bool {
    value.is_finite()
}

/// How the admitted value relates to the state before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// The counter just became 1
    First,
    /// Running statistics were unusable and have been reseeded from the value
    Reseeded,
    /// Ordinary update with the post-increment counter
    Next { count: i64 },
}

impl Step {
    /// Whether running statistics must restart from the admitted value
    pub(crate) fn restarts(self) -> bool {
        !matches!(self, Step::Next { .. })
    }
}

/// Counter plus extremes
///
/// The counter is signed so that a negative (corrupted) value can be detected
/// and healed rather than wrapping.
#[derive(Clone, Debug)]
pub(crate) struct Tally {
    pub(crate) count: i64,
    pub(crate) min: f64,
    pub(crate) max: f64,
}

impl Default for Tally {
    fn default() -> Self {
        Self::new()
    }
}

impl Tally {
    pub(crate) fn new() -> Self {
        Self {
            count: 0,
            min: f64::NAN,
            max: f64::NAN,
        }
    }

    /// Admit an already validated value
    ///
    /// `extra_healthy` reports whether the caller's own floating-point state
    /// (e.g. the running mean) is still finite. On error nothing changes.
    pub(crate) fn admit(
        &mut self,
        value: f64,
        extra_healthy: bool,
    ) -> Result<Step, SequenceLimitExceeded> {
        debug_assert!(is_observation(value));

        if self.count == COUNT_LIMIT {
            tracing::warn!(target: "streamstat", limit = COUNT_LIMIT, "sequence length limit reached");
            return Err(SequenceLimitExceeded {
                limit: COUNT_LIMIT as u64,
            });
        }
        if self.count < 0 {
            tracing::warn!(target: "streamstat", count = self.count, "negative counter, resetting to zero");
            self.count = 0;
        }
        self.count += 1;

        let healthy = extra_healthy && self.min.is_finite() && self.max.is_finite();
        let step = if self.count == 1 {
            Step::First
        } else if !healthy {
            tracing::warn!(
                target: "streamstat",
                count = self.count,
                "non-finite running statistics, reseeding from current value"
            );
            Step::Reseeded
        } else {
            Step::Next { count: self.count }
        };

        if step.restarts() {
            self.min = value;
            self.max = value;
        } else {
            self.min = math::fmin(self.min, value);
            self.max = math::fmax(self.max, value);
        }
        Ok(step)
    }

    /// Counter as exposed to callers
    pub(crate) fn count(&self) -> u64 {
        if self.count < 0 {
            0
        } else {
            self.count as u64
        }
    }
}

/// One step of the online mean recurrence for the `count`-th observation
///
/// Near the representable ceiling both operands are divided by `count` before
/// subtracting, so `value - mean` can never overflow. Returns the new mean and
/// whether the scaled form was used.
#[inline]
pub(crate) fn incremental_step(mean: f64, value: f64, count: i64) -> (f64, bool) {
    let n = count as f64;
    if math::abs(value) > SCALE_THRESHOLD || math::abs(mean) > SCALE_THRESHOLD {
        tracing::trace!(target: "streamstat", value, mean, count, "scaled mean update");
        let dv = value / n - mean / n;
        (mean + dv, true)
    } else {
        (mean + (value - mean) / n, false)
    }
}
