//! Exact-sum accumulator
//!
//! Sums every accepted value into a big rational and divides by the count on
//! read. Ingestion is serialized by an internal mutex, so one instance can be
//! fed from many threads through a shared reference.
//!
//! # Thread Safety
//!
//! `put_next` takes `&self` and holds the lock from validation through the
//! sum update. At the end of each call the counter and extremes are published
//! to atomics, which [`ExactAccumulator::min`], [`ExactAccumulator::max`] and
//! [`ExactAccumulator::count`] read without locking. Each of those reads sees
//! a completed call, but two of them may see *different* calls (a torn read
//! across fields). Use [`ExactAccumulator::snapshot`] when the fields must
//! agree; it takes the lock, as does [`ExactAccumulator::mean`].

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::accumulators::exact_sum::{ExactSum, DEFAULT_MEAN_SCALE};
use crate::accumulators::guard::{self, Step, Tally};
use crate::traits::{Accumulator, SequenceLimitExceeded, Summary};

/// State guarded by the ingestion lock
#[derive(Clone, Debug)]
struct ExactState {
    tally: Tally,
    sum: ExactSum,
}

/// Running min/max/count with an exact mean
///
/// Slower than [`IncrementalAccumulator`](crate::IncrementalAccumulator) on
/// both ingestion (big-rational addition under a lock) and [`mean`] (a
/// big-rational division rounded half-up to a fixed number of decimal
/// places), but the mean is the correctly rounded value of the true mean no
/// matter how long or how skewed the stream is.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use streamstat::ExactAccumulator;
///
/// let stats = Arc::new(ExactAccumulator::new());
///
/// let workers: Vec<_> = (0..4)
///     .map(|w| {
///         let stats = Arc::clone(&stats);
///         thread::spawn(move || {
///             for i in 0..100 {
///                 stats.put_next((w * 100 + i) as f64).unwrap();
///             }
///         })
///     })
///     .collect();
/// for worker in workers {
///     worker.join().unwrap();
/// }
///
/// let summary = stats.snapshot();
/// assert_eq!(summary.count, 400);
/// assert_eq!(summary.min, 0.0);
/// assert_eq!(summary.max, 399.0);
/// assert_eq!(summary.mean, 199.5);
/// ```
///
/// [`mean`]: ExactAccumulator::mean
#[derive(Debug)]
pub struct ExactAccumulator {
    state: Mutex<ExactState>,
    /// Published counter, written under the lock
    count: AtomicI64,
    /// Published `f64` bits of the minimum
    min: AtomicU64,
    /// Published `f64` bits of the maximum
    max: AtomicU64,
    /// Decimal places kept by the read-time division
    scale: u32,
}

impl Default for ExactAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ExactAccumulator {
    fn clone(&self) -> Self {
        let state = self.lock().clone();
        Self::with_state(state, self.scale)
    }
}

impl ExactAccumulator {
    /// Create a new empty accumulator with the default mean scale
    pub fn new() -> Self {
        Self::with_scale(DEFAULT_MEAN_SCALE)
    }

    /// Create a new empty accumulator that rounds the mean to `scale`
    /// decimal places
    ///
    /// Scales far below the default can round a tiny mean outside
    /// `[min, max]`.
    pub fn with_scale(scale: u32) -> Self {
        Self::with_state(
            ExactState {
                tally: Tally::new(),
                sum: ExactSum::new(),
            },
            scale,
        )
    }

    fn with_state(state: ExactState, scale: u32) -> Self {
        let acc = Self {
            count: AtomicI64::new(0),
            min: AtomicU64::new(f64::NAN.to_bits()),
            max: AtomicU64::new(f64::NAN.to_bits()),
            state: Mutex::new(state),
            scale,
        };
        acc.publish(&acc.lock().tally);
        acc
    }

    /// Decimal places kept by [`mean`](Self::mean)
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Ingest one observation
    ///
    /// Safe to call concurrently. NaN and infinities are ignored. Fails once
    /// `i64::MAX` observations have been accepted.
    pub fn put_next(&self, value: f64) -> Result<(), SequenceLimitExceeded> {
        let mut state = self.lock();
        if !guard::is_observation(value) {
            return Ok(());
        }

        match state.tally.admit(value, true)? {
            Step::First => state.sum.reset(value),
            Step::Reseeded | Step::Next { .. } => state.sum.add(value),
        }
        self.publish(&state.tally);
        Ok(())
    }

    /// Smallest accepted value, NaN when empty
    ///
    /// Lock-free; may belong to a different call than [`max`](Self::max) or
    /// [`count`](Self::count) read just before or after.
    pub fn min(&self) -> f64 {
        f64::from_bits(self.min.load(Ordering::Relaxed))
    }

    /// Largest accepted value, NaN when empty
    ///
    /// Lock-free, see [`min`](Self::min).
    pub fn max(&self) -> f64 {
        f64::from_bits(self.max.load(Ordering::Relaxed))
    }

    /// Number of accepted observations
    ///
    /// Lock-free, see [`min`](Self::min).
    pub fn count(&self) -> u64 {
        let count = self.count.load(Ordering::Relaxed);
        if count < 0 {
            0
        } else {
            count as u64
        }
    }

    /// Exact mean rounded half-up to [`scale`](Self::scale) decimal places,
    /// NaN when empty
    ///
    /// Takes the lock and performs a big-rational division.
    pub fn mean(&self) -> f64 {
        let state = self.lock();
        state.sum.mean(state.tally.count(), self.scale)
    }

    /// Consistent view of all statistics, taken under the lock
    pub fn snapshot(&self) -> Summary {
        let state = self.lock();
        let count = state.tally.count();
        if count == 0 {
            return Summary::empty();
        }
        Summary {
            count,
            min: state.tally.min,
            max: state.tally.max,
            mean: state.sum.mean(count, self.scale),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ExactState> {
        // Nothing inside the critical section leaves the state half-written
        // on panic, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, tally: &Tally) {
        self.min.store(tally.min.to_bits(), Ordering::Relaxed);
        self.max.store(tally.max.to_bits(), Ordering::Relaxed);
        self.count.store(tally.count, Ordering::Relaxed);
    }
}

impl Accumulator for ExactAccumulator {
    fn put_next(&mut self, value: f64) -> Result<(), SequenceLimitExceeded> {
        ExactAccumulator::put_next(self, value)
    }

    fn min(&self) -> f64 {
        ExactAccumulator::min(self)
    }

    fn max(&self) -> f64 {
        ExactAccumulator::max(self)
    }

    fn mean(&self) -> f64 {
        ExactAccumulator::mean(self)
    }

    fn count(&self) -> u64 {
        ExactAccumulator::count(self)
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>() + self.lock().sum.size_bytes()
    }

    fn summary(&self) -> Summary {
        self.snapshot()
    }
}
