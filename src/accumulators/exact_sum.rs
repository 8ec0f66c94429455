//! Arbitrary-precision running sum
//!
//! Every finite `f64` is a dyadic rational, so [`ExactSum`] holds the total as
//! a [`BigRational`] and never rounds while accumulating. Rounding happens
//! once, on read, at a fixed decimal scale with round-half-up.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

/// Default number of decimal places kept by the read-time division
///
/// The smallest non-zero mean of finite `f64` values is about 5e-343, so 400
/// places always retain far more than `f64` precision.
pub const DEFAULT_MEAN_SCALE: u32 = 400;

/// Exact sum of accepted observations
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ExactSum {
    total: BigRational,
}

impl Default for ExactSum {
    fn default() -> Self {
        Self::new()
    }
}

impl ExactSum {
    pub(crate) fn new() -> Self {
        Self {
            total: BigRational::zero(),
        }
    }

    /// Restart the sum at `value`
    pub(crate) fn reset(&mut self, value: f64) {
        self.total = to_rational(value);
    }

    /// Add `value` without rounding
    pub(crate) fn add(&mut self, value: f64) {
        self.total += to_rational(value);
    }

    /// `total / count`, rounded half-up to `scale` decimal places, as the
    /// nearest `f64`
    ///
    /// NaN when `count` is zero.
    pub(crate) fn mean(&self, count: u64, scale: u32) -> f64 {
        if count == 0 {
            return f64::NAN;
        }
        let unit = BigInt::from(10u32).pow(scale);
        let digits = round_half_up(&self.total, count, &unit);
        // The float parser rounds a decimal of any length correctly
        format!("{}e-{}", digits, scale)
            .parse()
            .unwrap_or(f64::NAN)
    }

    /// Approximate heap plus inline size
    pub(crate) fn size_bytes(&self) -> usize {
        let bits = self.total.numer().bits() + self.total.denom().bits();
        core::mem::size_of::<Self>() + (bits as usize + 7) / 8
    }
}

fn to_rational(value: f64) -> BigRational {
    // Only finite values reach this point; from_float is exact for them
    BigRational::from_float(value).unwrap_or_else(BigRational::zero)
}

/// `total / count * unit`, rounded half away from zero to an integer
fn round_half_up(total: &BigRational, count: u64, unit: &BigInt) -> BigInt {
    let mean = total / BigRational::from_integer(BigInt::from(count));
    let scaled = mean * BigRational::from_integer(unit.clone());
    scaled.round().to_integer()
}
