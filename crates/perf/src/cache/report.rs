//! Cache metrics reporting for external presentation layers.

use std::hash::Hash;

use tracing::info;

use super::core::Cache;
use crate::testing::Clock;

/// Named renderer over a cache's statistics.
///
/// The dashboard's presentation layer is out of scope here; this reporter
/// hands it plain structured data and a `tracing` event to forward.
///
/// # Example
/// ```
/// use pitwall_perf::cache::{Cache, CacheConfig, MetricsReporter};
///
/// let cache: Cache<String, i32> = Cache::new(CacheConfig::bounded(100));
/// cache.insert("lap:1".to_string(), 42);
/// let _ = cache.get(&"lap:1".to_string());
///
/// let reporter = MetricsReporter::new("lap_cache");
/// let json = reporter.report_json(&cache);
/// assert_eq!(json["hits"], 1);
/// ```
pub struct MetricsReporter {
    cache_name: String,
}

impl MetricsReporter {
    /// Create a reporter labeled with `cache_name`.
    pub fn new(cache_name: impl Into<String>) -> Self {
        Self { cache_name: cache_name.into() }
    }

    /// Emit the cache's current statistics as a `tracing` event.
    pub fn report<K, V, C>(&self, cache: &Cache<K, V, C>)
    where
        K: Eq + Hash + Clone,
        V: Clone,
        C: Clock,
    {
        let stats = cache.stats();
        info!(
            cache = %self.cache_name,
            size = stats.size,
            max_size = stats.max_size,
            hits = stats.hits,
            misses = stats.misses,
            hit_rate = format!("{:.1}%", stats.hit_rate()),
            evictions = stats.evictions,
            expirations = stats.expirations,
            "cache metrics report"
        );
    }

    /// Render the cache's current statistics as a JSON object.
    pub fn report_json<K, V, C>(&self, cache: &Cache<K, V, C>) -> serde_json::Value
    where
        K: Eq + Hash + Clone,
        V: Clone,
        C: Clock,
    {
        let stats = cache.stats();
        serde_json::json!({
            "cache_name": self.cache_name,
            "size": stats.size,
            "max_size": stats.max_size,
            "hits": stats.hits,
            "misses": stats.misses,
            "hit_rate": stats.hit_rate(),
            "evictions": stats.evictions,
            "expirations": stats.expirations,
            "total_accesses": stats.total_accesses(),
        })
    }
}
