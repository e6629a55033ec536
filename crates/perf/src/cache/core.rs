//! Core cache implementation.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::config::CacheConfig;
use super::entry::CacheEntry;
use super::stats::{CacheCounters, CacheStats};
use crate::monitor::PerformanceMonitor;
use crate::testing::{Clock, SystemClock};

/// Bounded key-value cache with per-entry TTL and LRU eviction.
///
/// Expired entries are removed lazily by the `get` that discovers them;
/// there is no background sweeper (see [`cleanup_expired`](Self::cleanup_expired)
/// for an explicit sweep). When the cache is at capacity and a new key is
/// inserted, exactly one entry — the one with the oldest last-access
/// instant — is evicted first.
///
/// Every `get` records exactly one hit or miss in the cache's own counters
/// and, if the cache was built with [`with_monitor`](Self::with_monitor),
/// in the shared [`PerformanceMonitor`] as well.
///
/// Cloning shares storage and counters, like the monitor itself.
///
/// # Type Parameters
/// - `K`: key type
/// - `V`: value type (cloned out on hits)
/// - `C`: clock, defaults to [`SystemClock`]
pub struct Cache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    storage: Arc<Mutex<HashMap<K, CacheEntry<V>>>>,
    config: CacheConfig,
    counters: CacheCounters,
    monitor: Option<PerformanceMonitor>,
    clock: C,
}

impl<K, V> Cache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache using the system clock, without monitor reporting.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Create a cache that reports every hit and miss into `monitor`.
    pub fn with_monitor(config: CacheConfig, monitor: PerformanceMonitor) -> Self {
        Self::with_monitor_and_clock(config, monitor, SystemClock)
    }
}

impl<K, V, C> Cache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    /// Create a cache with a custom clock (useful for testing).
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
            config,
            counters: CacheCounters::new(),
            monitor: None,
            clock,
        }
    }

    /// Create a cache with both a shared monitor and a custom clock.
    pub fn with_monitor_and_clock(
        config: CacheConfig,
        monitor: PerformanceMonitor,
        clock: C,
    ) -> Self {
        Self { monitor: Some(monitor), ..Self::with_clock(config, clock) }
    }

    /// Look up `key`.
    ///
    /// Returns `None` for an absent key, and for an expired one after
    /// removing it. A returned value has its entry's access metadata
    /// refreshed. Exactly one hit or miss is recorded per call.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.storage.lock();

        let expired = match entries.get(key) {
            Some(entry) => entry.is_expired(now),
            None => {
                self.on_miss();
                return None;
            }
        };

        if expired {
            entries.remove(key);
            self.counters.record_expiration();
            debug!("cache entry expired");
            self.on_miss();
            return None;
        }

        if let Some(entry) = entries.get_mut(key) {
            entry.touch(now);
            self.on_hit();
            Some(entry.value.clone())
        } else {
            self.on_miss();
            None
        }
    }

    /// Insert `value` under `key` with the configured default TTL.
    ///
    /// At capacity, inserting a *new* key first evicts the entry with the
    /// oldest last-access instant; overwriting an existing key never
    /// evicts.
    pub fn insert(&self, key: K, value: V) {
        self.insert_with_ttl(key, value, None);
    }

    /// Insert with a TTL override. `None` falls back to the configured
    /// default TTL.
    pub fn insert_with_ttl(&self, key: K, value: V, ttl: Option<Duration>) {
        let effective_ttl = ttl.or(self.config.default_ttl);
        let now = self.clock.now();
        let mut entries = self.storage.lock();

        if entries.len() >= self.config.max_size && !entries.contains_key(&key) {
            Self::evict_lru(&mut entries, &self.counters);
        }

        entries.insert(key, CacheEntry::new(value, effective_ttl, now));
        debug!(ttl = ?effective_ttl, size = entries.len(), "cache set");
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.storage.lock().remove(key).map(|entry| entry.value)
    }

    /// Look up `key`, inserting the value produced by `f` on a miss.
    pub fn get_or_insert_with<F>(&self, key: K, f: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = f();
        self.insert(key, value.clone());
        value
    }

    /// Empty the cache and zero its local counters.
    ///
    /// The shared monitor's counters are deliberately untouched — they
    /// aggregate across the whole process lifetime.
    pub fn clear(&self) {
        self.storage.lock().clear();
        self.counters.reset();
        info!("cache cleared");
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.storage.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every expired entry, returning how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.storage.lock();

        let expired_keys: Vec<K> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            entries.remove(key);
            self.counters.record_expiration();
        }

        debug!(removed = expired_keys.len(), "expired entries swept");
        expired_keys.len()
    }

    /// Current statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        let size = self.len();
        self.counters.snapshot(size, self.config.max_size)
    }

    fn on_hit(&self) {
        self.counters.record_hit();
        if let Some(monitor) = &self.monitor {
            monitor.record_cache_hit();
        }
        debug!("cache hit");
    }

    fn on_miss(&self) {
        self.counters.record_miss();
        if let Some(monitor) = &self.monitor {
            monitor.record_cache_miss();
        }
        debug!("cache miss");
    }

    /// Evict exactly one entry — the one with the oldest last-access
    /// instant. Ties go to whichever the scan finds first.
    fn evict_lru(entries: &mut HashMap<K, CacheEntry<V>>, counters: &CacheCounters) {
        let lru_key = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(key, _)| key.clone());

        if let Some(key) = lru_key {
            entries.remove(&key);
            counters.record_eviction();
            debug!("evicted LRU entry");
        }
    }
}

impl<K, V, C> Clone for Cache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: self.config.clone(),
            counters: self.counters.clone(),
            monitor: self.monitor.clone(),
            clock: self.clock.clone(),
        }
    }
}
