//! Math function wrappers for std/no_std compatibility
//!
//! Uses standard library math when available, falls back to libm for no_std.

#[cfg(feature = "std")]
#[inline]
pub fn abs(x: f64) -> f64 {
    x.abs()
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn abs(x: f64) -> f64 {
    libm::fabs(x)
}

#[cfg(feature = "std")]
#[inline]
pub fn fmin(x: f64, y: f64) -> f64 {
    x.min(y)
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn fmin(x: f64, y: f64) -> f64 {
    libm::fmin(x, y)
}

#[cfg(feature = "std")]
#[inline]
pub fn fmax(x: f64, y: f64) -> f64 {
    x.max(y)
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn fmax(x: f64, y: f64) -> f64 {
    libm::fmax(x, y)
}
