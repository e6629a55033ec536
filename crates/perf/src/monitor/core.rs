//! Bounded metric log with cache hit/miss accounting.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};

use super::metric::OperationMetric;

/// How many of the slowest records `stats` renders.
const STATS_SLOWEST_LIMIT: usize = 3;

#[derive(Debug)]
struct MonitorInner {
    records: Mutex<VecDeque<OperationMetric>>,
    max_records: usize,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

/// Collector for operation metrics and cache hit/miss counts.
///
/// Cloning is cheap and clones share state: the application creates one
/// monitor at startup and passes clones to every cache and instrumented
/// operation that should report into it. The record log keeps at most
/// `max_records` entries, dropping the oldest on overflow.
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    inner: Arc<MonitorInner>,
}

impl PerformanceMonitor {
    /// Create a monitor retaining at most `max_records` metric records.
    pub fn new(max_records: usize) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                records: Mutex::new(VecDeque::new()),
                max_records,
                cache_hits: AtomicU64::new(0),
                cache_misses: AtomicU64::new(0),
            }),
        }
    }

    /// Append a metric record, dropping the oldest records while the log
    /// exceeds its configured maximum.
    pub fn record(&self, metric: OperationMetric) {
        debug!(metric = %metric, "metric recorded");
        let mut records = self.inner.records.lock();
        records.push_back(metric);
        while records.len() > self.inner.max_records {
            records.pop_front();
        }
    }

    /// Count one cache hit.
    pub fn record_cache_hit(&self) {
        self.inner.cache_hits.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Count one cache miss.
    pub fn record_cache_miss(&self) {
        self.inner.cache_misses.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Cache hit rate as a percentage (0–100). `0.0` before any access.
    pub fn cache_hit_rate(&self) -> f64 {
        let hits = self.inner.cache_hits.load(AtomicOrdering::Relaxed);
        let misses = self.inner.cache_misses.load(AtomicOrdering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            return 0.0;
        }
        hits as f64 / total as f64 * 100.0
    }

    /// Mean duration in milliseconds across all records, or only those for
    /// `operation` if given. `0.0` on an empty match set.
    pub fn average_duration(&self, operation: Option<&str>) -> f64 {
        let records = self.inner.records.lock();
        let matching: Vec<f64> = records
            .iter()
            .filter(|m| operation.map_or(true, |op| m.operation == op))
            .map(|m| m.duration_ms)
            .collect();

        if matching.is_empty() {
            return 0.0;
        }
        matching.iter().sum::<f64>() / matching.len() as f64
    }

    /// Up to `limit` records sorted by duration descending. The sort is
    /// stable, so ties keep their original order.
    pub fn slowest(&self, limit: usize) -> Vec<OperationMetric> {
        let records = self.inner.records.lock();
        let mut sorted: Vec<OperationMetric> = records.iter().cloned().collect();
        sorted.sort_by(|a, b| {
            b.duration_ms.partial_cmp(&a.duration_ms).unwrap_or(Ordering::Equal)
        });
        sorted.truncate(limit);
        sorted
    }

    /// All failed records in original order.
    pub fn failed(&self) -> Vec<OperationMetric> {
        let records = self.inner.records.lock();
        records.iter().filter(|m| !m.success).cloned().collect()
    }

    /// Snapshot of the records currently retained, oldest first.
    pub fn records(&self) -> Vec<OperationMetric> {
        self.inner.records.lock().iter().cloned().collect()
    }

    /// Number of records currently retained.
    pub fn len(&self) -> usize {
        self.inner.records.lock().len()
    }

    /// Whether the record log is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of aggregate statistics, suitable for display or logging.
    pub fn stats(&self) -> MonitorStats {
        let failed = self.failed().len();
        let slowest = self.slowest(STATS_SLOWEST_LIMIT).iter().map(ToString::to_string).collect();
        let total_records = self.len();

        MonitorStats {
            total_records,
            succeeded: total_records - failed,
            failed,
            cache_hits: self.inner.cache_hits.load(AtomicOrdering::Relaxed),
            cache_misses: self.inner.cache_misses.load(AtomicOrdering::Relaxed),
            cache_hit_rate: self.cache_hit_rate(),
            avg_duration_ms: self.average_duration(None),
            slowest,
            captured_at: Utc::now(),
        }
    }

    /// Empty the record log and zero both cache counters.
    pub fn clear(&self) {
        self.inner.records.lock().clear();
        self.inner.cache_hits.store(0, AtomicOrdering::Relaxed);
        self.inner.cache_misses.store(0, AtomicOrdering::Relaxed);
        info!("performance monitor cleared");
    }
}

/// Point-in-time aggregate view of a [`PerformanceMonitor`].
#[derive(Debug, Clone, Serialize)]
pub struct MonitorStats {
    /// Records currently retained.
    pub total_records: usize,
    /// Retained records with `success = true`.
    pub succeeded: usize,
    /// Retained records with `success = false`.
    pub failed: usize,
    /// Cumulative cache hits across all reporting caches.
    pub cache_hits: u64,
    /// Cumulative cache misses across all reporting caches.
    pub cache_misses: u64,
    /// Hit rate as a percentage (0–100).
    pub cache_hit_rate: f64,
    /// Mean duration across all retained records, in milliseconds.
    pub avg_duration_ms: f64,
    /// Display renderings of the slowest retained records.
    pub slowest: Vec<String>,
    /// When this snapshot was taken.
    pub captured_at: DateTime<Utc>,
}
