//! Explicit instrumentation and caching wrappers.
//!
//! Operations are anything implementing [`Operation`]; plain closures are
//! adapted with [`op_fn`]. Wrapping is explicit higher-order construction:
//! [`Instrumented`] times each call and records the outcome into a shared
//! [`PerformanceMonitor`], [`Cached`] short-circuits repeated calls
//! through an owned cache. Both wrappers implement [`Operation`]
//! themselves, so they compose in either order.
//!
//! Both layers are transparent: callers observe only the wrapped
//! operation's own success/failure contract. A failure is never swallowed
//! and never cached.
//!
//! # Example
//!
//! ```
//! use pitwall_perf::cache::CacheConfig;
//! use pitwall_perf::instrument::{op_fn, Cached, Instrumented, Operation};
//! use pitwall_perf::monitor::PerformanceMonitor;
//!
//! let monitor = PerformanceMonitor::new(1000);
//! let load_lap = Cached::with_monitor(
//!     CacheConfig::bounded(64),
//!     monitor.clone(),
//!     Instrumented::new(
//!         "telemetry",
//!         "load_lap",
//!         monitor.clone(),
//!         op_fn(|lap: u32| Ok::<_, std::convert::Infallible>(lap * 2)),
//!     ),
//! );
//!
//! assert_eq!(load_lap.call(7), Ok(14)); // miss: runs and records the operation
//! assert_eq!(load_lap.call(7), Ok(14)); // hit: operation not run
//! assert_eq!(monitor.stats().cache_hits, 1);
//! assert_eq!(monitor.len(), 1);
//! ```

use std::fmt::Display;

use tracing::warn;

use crate::cache::{Cache, CacheConfig, CacheKey};
use crate::monitor::{OperationMetric, PerformanceMonitor};
use crate::testing::{Clock, SystemClock};

/// A synchronous, fallible operation over one input.
///
/// Zero-argument operations take `()`; multi-argument operations take a
/// tuple. The error type only needs a display form so the
/// instrumentation layer can record it.
pub trait Operation<I> {
    /// Successful result type.
    type Output;
    /// Failure type, passed through wrappers unchanged.
    type Error: Display;

    /// Run the operation.
    fn call(&self, input: I) -> Result<Self::Output, Self::Error>;
}

/// Adapter giving closures an [`Operation`] implementation.
///
/// Construct with [`op_fn`].
#[derive(Debug, Clone)]
pub struct OpFn<F> {
    f: F,
}

/// Adapt a `Fn(I) -> Result<T, E>` closure into an [`Operation`].
pub fn op_fn<F>(f: F) -> OpFn<F> {
    OpFn { f }
}

impl<F, I, T, E> Operation<I> for OpFn<F>
where
    F: Fn(I) -> Result<T, E>,
    E: Display,
{
    type Output = T;
    type Error = E;

    fn call(&self, input: I) -> Result<T, E> {
        (self.f)(input)
    }
}

/// Wrapper that times each call and records the outcome.
///
/// On success it records a successful [`OperationMetric`] and returns the
/// value unchanged; on failure it records a failed metric carrying the
/// error's display text and propagates the error unchanged.
pub struct Instrumented<Op, C = SystemClock> {
    name: String,
    operation: String,
    monitor: PerformanceMonitor,
    clock: C,
    inner: Op,
}

impl<Op> Instrumented<Op, SystemClock> {
    /// Wrap `inner`, reporting into `monitor` under the given scope label
    /// and operation name.
    pub fn new(
        name: impl Into<String>,
        operation: impl Into<String>,
        monitor: PerformanceMonitor,
        inner: Op,
    ) -> Self {
        Self::with_clock(name, operation, monitor, SystemClock, inner)
    }
}

impl<Op, C: Clock> Instrumented<Op, C> {
    /// Wrap with a custom clock (useful for testing).
    pub fn with_clock(
        name: impl Into<String>,
        operation: impl Into<String>,
        monitor: PerformanceMonitor,
        clock: C,
        inner: Op,
    ) -> Self {
        Self { name: name.into(), operation: operation.into(), monitor, clock, inner }
    }

    /// The monitor this wrapper reports into.
    pub fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }
}

impl<Op, I, C> Operation<I> for Instrumented<Op, C>
where
    Op: Operation<I>,
    C: Clock,
{
    type Output = Op::Output;
    type Error = Op::Error;

    fn call(&self, input: I) -> Result<Op::Output, Op::Error> {
        let start = self.clock.now();
        let result = self.inner.call(input);
        let duration_ms = self.clock.now().duration_since(start).as_secs_f64() * 1000.0;

        match result {
            Ok(value) => {
                self.monitor.record(OperationMetric::succeeded(
                    self.name.as_str(),
                    self.operation.as_str(),
                    duration_ms,
                ));
                Ok(value)
            }
            Err(error) => {
                warn!(
                    operation = %self.operation,
                    duration_ms,
                    error = %error,
                    "operation failed"
                );
                self.monitor.record(OperationMetric::failed(
                    self.name.as_str(),
                    self.operation.as_str(),
                    duration_ms,
                    error.to_string(),
                ));
                Err(error)
            }
        }
    }
}

/// Wrapper that caches an operation's results in an owned cache.
///
/// The key is derived from the input via [`CacheKey`]. A hit returns the
/// cached value without running the inner operation; a miss runs it and,
/// only on success, stores the result. If key derivation fails the cache
/// is bypassed entirely — the operation still runs and its result is
/// still returned.
pub struct Cached<Op, V, C = SystemClock>
where
    V: Clone,
    C: Clock,
{
    cache: Cache<String, V, C>,
    inner: Op,
}

impl<Op, V: Clone> Cached<Op, V, SystemClock> {
    /// Wrap `inner` with a cache built from `config`.
    pub fn new(config: CacheConfig, inner: Op) -> Self {
        Self { cache: Cache::new(config), inner }
    }

    /// Wrap `inner` with a cache that also reports hits and misses into
    /// the shared `monitor`.
    pub fn with_monitor(config: CacheConfig, monitor: PerformanceMonitor, inner: Op) -> Self {
        Self { cache: Cache::with_monitor(config, monitor), inner }
    }
}

impl<Op, V: Clone, C: Clock> Cached<Op, V, C> {
    /// Wrap `inner` around an existing cache (useful for testing with a
    /// mock clock).
    pub fn with_cache(cache: Cache<String, V, C>, inner: Op) -> Self {
        Self { cache, inner }
    }

    /// The wrapper's owned cache, for inspection.
    pub fn cache(&self) -> &Cache<String, V, C> {
        &self.cache
    }
}

impl<Op, I, V, C> Operation<I> for Cached<Op, V, C>
where
    Op: Operation<I, Output = V>,
    I: CacheKey,
    V: Clone,
    C: Clock,
{
    type Output = V;
    type Error = Op::Error;

    fn call(&self, input: I) -> Result<V, Op::Error> {
        let key = match input.cache_key() {
            Ok(key) => key,
            Err(error) => {
                warn!(%error, "cache key derivation failed, bypassing cache");
                return self.inner.call(input);
            }
        };

        if let Some(value) = self.cache.get(&key) {
            return Ok(value);
        }

        let value = self.inner.call(input)?;
        self.cache.insert(key, value.clone());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for instrument.
    use std::cell::Cell;
    use std::fmt;

    use super::*;
    use crate::error::KeyError;
    use crate::testing::MockClock;

    /// Input type whose key derivation always fails.
    struct Unkeyable(u32);

    impl CacheKey for Unkeyable {
        fn cache_key(&self) -> Result<String, KeyError> {
            Err(KeyError::UnprintableArg(0))
        }
    }

    /// Validates `op_fn` adapts a closure into an `Operation`.
    #[test]
    fn test_op_fn() {
        let double = op_fn(|x: u32| Ok::<_, std::convert::Infallible>(x * 2));
        assert_eq!(double.call(21), Ok(42));
    }

    /// Validates a successful instrumented call records a success metric
    /// and returns the result unchanged.
    #[test]
    fn test_instrumented_success() {
        let monitor = PerformanceMonitor::new(10);
        let clock = MockClock::new();
        let clock_for_op = clock.clone();

        let op = Instrumented::with_clock(
            "telemetry",
            "double",
            monitor.clone(),
            clock.clone(),
            op_fn(move |x: u32| {
                clock_for_op.advance(std::time::Duration::from_millis(25));
                Ok::<_, std::convert::Infallible>(x * 2)
            }),
        );

        assert_eq!(op.call(4), Ok(8));

        let records = monitor.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].operation, "double");
        assert!(records[0].success);
        assert!((records[0].duration_ms - 25.0).abs() < 1e-6);
    }

    /// Validates a failing instrumented call records a failure metric and
    /// propagates the error unchanged.
    #[test]
    fn test_instrumented_failure_propagates() {
        let monitor = PerformanceMonitor::new(10);
        let op = Instrumented::new(
            "telemetry",
            "load",
            monitor.clone(),
            op_fn(|_: u32| Err::<u32, _>("provider timeout")),
        );

        assert_eq!(op.call(1), Err("provider timeout"));

        let failed = monitor.failed();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].error.as_deref(), Some("provider timeout"));
    }

    /// Validates the cached wrapper runs the inner operation once per
    /// distinct input and replays the first result on hits.
    #[test]
    fn test_cached_single_execution() {
        let calls = Cell::new(0u32);
        let op = Cached::new(
            CacheConfig::bounded(10),
            op_fn(|x: u32| {
                calls.set(calls.get() + 1);
                Ok::<_, std::convert::Infallible>(x * 2)
            }),
        );

        assert_eq!(op.call(5), Ok(10));
        assert_eq!(op.call(5), Ok(10));
        assert_eq!(op.call(6), Ok(12));

        assert_eq!(calls.get(), 2);
        let stats = op.cache().stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
    }

    /// Validates a failed inner operation is not cached and its error
    /// reaches the caller.
    #[test]
    fn test_cached_does_not_cache_failures() {
        let calls = Cell::new(0u32);
        let op = Cached::new(
            CacheConfig::bounded(10),
            op_fn(|_: u32| {
                calls.set(calls.get() + 1);
                Err::<u32, _>("boom")
            }),
        );

        assert_eq!(op.call(1), Err("boom"));
        assert_eq!(op.call(1), Err("boom"));

        assert_eq!(calls.get(), 2);
        assert!(op.cache().is_empty());
    }

    /// Validates key-derivation failure bypasses the cache without
    /// failing the call.
    #[test]
    fn test_cached_bypasses_on_key_failure() {
        let calls = Cell::new(0u32);
        let op = Cached::new(
            CacheConfig::bounded(10),
            op_fn(|input: Unkeyable| {
                calls.set(calls.get() + 1);
                Ok::<_, std::convert::Infallible>(input.0 * 2)
            }),
        );

        assert_eq!(op.call(Unkeyable(3)), Ok(6));
        assert_eq!(op.call(Unkeyable(3)), Ok(6));

        // No caching happened: the operation ran both times.
        assert_eq!(calls.get(), 2);
        assert!(op.cache().is_empty());
        assert_eq!(op.cache().stats().total_accesses(), 0);
    }

    /// Validates composition in both orders: a hit is zero inner
    /// executions but exactly one hit event.
    #[test]
    fn test_composition_both_orders() {
        let monitor = PerformanceMonitor::new(100);
        let calls = Cell::new(0u32);
        let cached_inside = Instrumented::new(
            "telemetry",
            "outer",
            monitor.clone(),
            Cached::with_monitor(
                CacheConfig::bounded(10),
                monitor.clone(),
                op_fn(|x: u32| {
                    calls.set(calls.get() + 1);
                    Ok::<_, std::convert::Infallible>(x + 1)
                }),
            ),
        );

        assert_eq!(cached_inside.call(1), Ok(2));
        assert_eq!(cached_inside.call(1), Ok(2));
        assert_eq!(calls.get(), 1);
        assert_eq!(monitor.stats().cache_hits, 1);
        assert_eq!(monitor.stats().cache_misses, 1);
        // The instrumented layer saw both calls.
        assert_eq!(monitor.len(), 2);

        monitor.clear();
        calls.set(0);

        let instrumented_inside = Cached::with_monitor(
            CacheConfig::bounded(10),
            monitor.clone(),
            Instrumented::new(
                "telemetry",
                "inner",
                monitor.clone(),
                op_fn(|x: u32| {
                    calls.set(calls.get() + 1);
                    Ok::<_, std::convert::Infallible>(x + 1)
                }),
            ),
        );

        assert_eq!(instrumented_inside.call(1), Ok(2));
        assert_eq!(instrumented_inside.call(1), Ok(2));
        assert_eq!(calls.get(), 1);
        assert_eq!(monitor.stats().cache_hits, 1);
        // A hit short-circuits before the instrumented layer: one metric.
        assert_eq!(monitor.len(), 1);
    }

    /// Validates tuple inputs derive keys ignoring named order via the
    /// trait, and that equal tuples share one execution.
    #[test]
    fn test_cached_tuple_input() {
        let calls = Cell::new(0u32);
        let op = Cached::new(
            CacheConfig::bounded(10),
            op_fn(|(year, track): (u32, &str)| {
                calls.set(calls.get() + 1);
                Ok::<_, std::convert::Infallible>(format!("{year}-{track}"))
            }),
        );

        assert_eq!(op.call((2026, "monza")).as_deref(), Ok("2026-monza"));
        assert_eq!(op.call((2026, "monza")).as_deref(), Ok("2026-monza"));
        assert_eq!(op.call((2026, "spa")).as_deref(), Ok("2026-spa"));
        assert_eq!(calls.get(), 2);
    }

    #[derive(Debug, PartialEq)]
    struct OpaqueError;

    impl fmt::Display for OpaqueError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "opaque failure")
        }
    }

    /// Validates a custom error type passes through both wrappers intact.
    #[test]
    fn test_custom_error_passthrough() {
        let monitor = PerformanceMonitor::new(10);
        let op = Cached::with_monitor(
            CacheConfig::bounded(10),
            monitor.clone(),
            Instrumented::new(
                "telemetry",
                "load",
                monitor.clone(),
                op_fn(|_: u32| Err::<u32, _>(OpaqueError)),
            ),
        );

        assert_eq!(op.call(9), Err(OpaqueError));
        assert_eq!(monitor.failed()[0].error.as_deref(), Some("opaque failure"));
    }
}
