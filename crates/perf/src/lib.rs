//! Performance instrumentation and caching core for the Pitwall dashboard.
//!
//! The dashboard's data services are read-heavy and call into a slow
//! third-party telemetry provider, so every expensive lookup goes through
//! two thin layers provided by this crate:
//!
//! - a [`cache::Cache`] with per-entry TTL expiration and LRU eviction,
//! - a [`monitor::PerformanceMonitor`] holding a bounded log of timed
//!   operations plus cache hit/miss counters shared by every cache.
//!
//! Both are wired together by the explicit wrappers in [`instrument`]:
//! [`instrument::Instrumented`] times an operation and records the outcome,
//! [`instrument::Cached`] short-circuits repeated calls through an owned
//! cache. The wrappers compose in either order.
//!
//! # Example
//!
//! ```
//! use pitwall_perf::cache::CacheConfig;
//! use pitwall_perf::instrument::{op_fn, Cached, Instrumented, Operation};
//! use pitwall_perf::monitor::PerformanceMonitor;
//!
//! let monitor = PerformanceMonitor::new(1000);
//!
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
//! assert_eq!(load_lap.call(7), Ok(14)); // miss, runs the operation
//! assert_eq!(load_lap.call(7), Ok(14)); // hit, operation not run
//! assert_eq!(monitor.stats().cache_hits, 1);
//! ```
//!
//! There is no hidden global state: the application constructs one monitor
//! at startup and passes clones of it to whichever caches and wrappers
//! should report into it.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod cache;
pub mod error;
pub mod instrument;
pub mod monitor;
pub mod testing;

// Re-export commonly used types for convenience
pub use cache::{Cache, CacheConfig, CacheStats, KeyBuilder, MetricsReporter};
pub use error::KeyError;
pub use instrument::{op_fn, Cached, Instrumented, OpFn, Operation};
pub use monitor::{MonitorStats, OperationMetric, PerformanceMonitor};
pub use testing::{Clock, MockClock, SystemClock};
