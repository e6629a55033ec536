//! Cache statistics and counter collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

/// Point-in-time statistics for one cache.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Current number of entries.
    pub size: usize,

    /// Maximum allowed entries.
    pub max_size: usize,

    /// Successful reads.
    pub hits: u64,

    /// Reads of absent or expired keys.
    pub misses: u64,

    /// Entries removed to make room at capacity.
    pub evictions: u64,

    /// Entries removed because their TTL elapsed.
    pub expirations: u64,
}

impl CacheStats {
    /// Hit rate as a percentage (0–100). `0.0` before any access.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }

    /// Total read operations (hits + misses).
    pub fn total_accesses(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Lock-free counter set shared by clones of one cache.
#[derive(Debug)]
pub(super) struct CacheCounters {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    evictions: Arc<AtomicU64>,
    expirations: Arc<AtomicU64>,
}

impl Clone for CacheCounters {
    fn clone(&self) -> Self {
        Self {
            hits: Arc::clone(&self.hits),
            misses: Arc::clone(&self.misses),
            evictions: Arc::clone(&self.evictions),
            expirations: Arc::clone(&self.expirations),
        }
    }
}

impl CacheCounters {
    pub(super) fn new() -> Self {
        Self {
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            evictions: Arc::new(AtomicU64::new(0)),
            expirations: Arc::new(AtomicU64::new(0)),
        }
    }

    pub(super) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_expiration(&self) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn snapshot(&self, size: usize, max_size: usize) -> CacheStats {
        CacheStats {
            size,
            max_size,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
        }
    }

    pub(super) fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.expirations.store(0, Ordering::Relaxed);
    }
}
