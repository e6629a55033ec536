//! Performance monitoring and metrics collection.
//!
//! A [`PerformanceMonitor`] holds a bounded, chronological log of
//! [`OperationMetric`] records plus running cache hit/miss counters. The
//! application constructs one monitor at startup and hands clones of it to
//! every instrumented operation and cache; clones share state, so the
//! counters tolerate concurrent increments from many independent caches.
//!
//! All queries are total functions over the monitor's current state — no
//! method here ever fails.
//!
//! # Example
//!
//! ```
//! use pitwall_perf::monitor::{OperationMetric, PerformanceMonitor};
//!
//! let monitor = PerformanceMonitor::new(1000);
//! monitor.record(OperationMetric::succeeded("telemetry", "load_session", 42.5));
//! monitor.record_cache_hit();
//!
//! let stats = monitor.stats();
//! assert_eq!(stats.total_records, 1);
//! assert_eq!(stats.cache_hits, 1);
//! ```

mod core;
mod metric;

pub use self::core::{MonitorStats, PerformanceMonitor};
pub use metric::OperationMetric;
