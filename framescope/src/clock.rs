//! Tick sources that feed the profiler's timestamps.
//!
//! The profiler never reads the wall clock directly; it asks a [`TickSource`]
//! for a monotonically increasing tick count and a tick rate. Production code
//! uses [`InstantTicks`]; tests and offline tooling use [`ManualTicks`] to get
//! fully deterministic timings.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

/// A monotonic high-precision tick counter.
///
/// Implementations must be cheap to query: `now_ticks` is called on every
/// instrumented region entry and exit.
pub trait TickSource: Send + Sync {
    /// Current tick count. Expected to be monotonically non-decreasing;
    /// consumers clamp rather than fail if it is not.
    fn now_ticks(&self) -> u64;

    /// Number of ticks per second, used to convert tick spans to seconds.
    fn ticks_per_second(&self) -> u64;
}

impl<T: TickSource + ?Sized> TickSource for std::sync::Arc<T> {
    fn now_ticks(&self) -> u64 {
        (**self).now_ticks()
    }

    fn ticks_per_second(&self) -> u64 {
        (**self).ticks_per_second()
    }
}

/// Convert a tick span to seconds at the given tick rate.
///
/// A rate of zero yields `0.0` rather than a NaN.
pub fn ticks_to_seconds(ticks: u64, ticks_per_second: u64) -> f64 {
    if ticks_per_second == 0 {
        return 0.0;
    }
    ticks as f64 / ticks_per_second as f64
}

/// The production tick source: nanoseconds elapsed since construction,
/// measured with [`std::time::Instant`].
pub struct InstantTicks {
    origin: Instant,
}

impl InstantTicks {
    /// Create a tick source whose epoch is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for InstantTicks {
    fn now_ticks(&self) -> u64 {
        // Instant is monotonic; u64 nanoseconds cover ~584 years of uptime.
        self.origin.elapsed().as_nanos() as u64
    }

    fn ticks_per_second(&self) -> u64 {
        1_000_000_000
    }
}

/// A manually driven tick source for tests, doctests and demos.
///
/// Time only moves when [`advance`](Self::advance) or [`set`](Self::set) is
/// called. Share it with the profiler through an `Arc`:
///
/// ```
/// use std::sync::Arc;
/// use framescope::{ManualTicks, TickSource};
///
/// let clock = Arc::new(ManualTicks::new(1_000));
/// let handle: Box<dyn TickSource> = Box::new(clock.clone());
/// clock.advance(16);
/// assert_eq!(handle.now_ticks(), 16);
/// ```
pub struct ManualTicks {
    now: AtomicU64,
    ticks_per_second: u64,
}

impl ManualTicks {
    /// Create a manual source at tick zero with the given tick rate.
    pub fn new(ticks_per_second: u64) -> Self {
        Self {
            now: AtomicU64::new(0),
            ticks_per_second,
        }
    }

    /// Advance the current tick count by `ticks`.
    pub fn advance(&self, ticks: u64) {
        self.now.fetch_add(ticks, Ordering::Relaxed);
    }

    /// Set the current tick count to an absolute value.
    pub fn set(&self, ticks: u64) {
        self.now.store(ticks, Ordering::Relaxed);
    }
}

impl TickSource for ManualTicks {
    fn now_ticks(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }

    fn ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }
}
