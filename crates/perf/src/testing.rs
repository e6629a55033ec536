//! Time abstraction for testability.
//!
//! TTL expiration and operation timing both read the clock, so they take a
//! [`Clock`] implementation instead of calling `Instant::now()` directly.
//! Production code uses [`SystemClock`]; tests use [`MockClock`] and advance
//! time manually, which keeps expiry tests deterministic and fast.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use pitwall_perf::testing::{Clock, MockClock};
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.now().duration_since(start), Duration::from_secs(5));
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Monotonic clock source.
pub trait Clock: Send + Sync {
    /// Current instant, suitable for measuring durations.
    fn now(&self) -> Instant;
}

/// Real system clock. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Controllable clock for deterministic tests.
///
/// Starts at the current real time; simulated time only moves when
/// [`advance`](MockClock::advance) is called. Clones share the same
/// simulated time.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    /// Create a new mock clock with zero elapsed time.
    pub fn new() -> Self {
        Self { start: Instant::now(), elapsed: Arc::new(Mutex::new(Duration::ZERO)) }
    }

    /// Simulate `duration` passing without actually waiting.
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }

    /// Total simulated time since the clock was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock()
    }
}
