//! TTL/LRU cache with hit/miss statistics.
//!
//! [`Cache`] is a bounded key-value store: entries expire lazily once their
//! time-to-live elapses, and when the map is at capacity the entry with the
//! oldest last-access instant is evicted before a new key is inserted. Each
//! cache keeps its own hit/miss counters and can additionally report every
//! hit and miss into a shared [`PerformanceMonitor`].
//!
//! Time is read through the [`Clock`](crate::testing::Clock) trait, so
//! expiry behavior is deterministic under test via
//! [`MockClock`](crate::testing::MockClock).
//!
//! # Examples
//!
//! ## Bounded LRU cache
//! ```
//! use pitwall_perf::cache::{Cache, CacheConfig};
//!
//! let cache: Cache<String, i32> = Cache::new(CacheConfig::bounded(100));
//! cache.insert("lap:1".to_string(), 42);
//! assert_eq!(cache.get(&"lap:1".to_string()), Some(42));
//! ```
//!
//! ## TTL with a shared monitor
//! ```
//! use std::time::Duration;
//!
//! use pitwall_perf::cache::{Cache, CacheConfig};
//! use pitwall_perf::monitor::PerformanceMonitor;
//!
//! let monitor = PerformanceMonitor::new(1000);
//! let config = CacheConfig::builder()
//!     .max_size(500)
//!     .default_ttl(Duration::from_secs(300))
//!     .build();
//! let cache: Cache<String, String> = Cache::with_monitor(config, monitor.clone());
//!
//! cache.insert("schedule:2026".to_string(), "...".to_string());
//! let _ = cache.get(&"schedule:2026".to_string());
//! assert_eq!(monitor.stats().cache_hits, 1);
//! ```
//!
//! [`PerformanceMonitor`]: crate::monitor::PerformanceMonitor

mod config;
mod core;
mod entry;
mod key;
mod report;
mod stats;

pub use config::{CacheConfig, CacheConfigBuilder};
pub use self::core::Cache;
pub use key::{CacheKey, KeyBuilder};
pub use report::MetricsReporter;
pub use stats::CacheStats;
