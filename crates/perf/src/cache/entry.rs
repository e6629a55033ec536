//! Cache entry with expiration and access metadata.

use std::time::{Duration, Instant};

/// A cached value together with its expiration and access bookkeeping.
///
/// `last_accessed` drives LRU eviction; `access_count` is informational.
#[derive(Debug, Clone)]
pub(super) struct CacheEntry<V> {
    pub(super) value: V,
    created_at: Instant,
    ttl: Option<Duration>,
    pub(super) access_count: u64,
    pub(super) last_accessed: Instant,
}

impl<V> CacheEntry<V> {
    /// Create a fresh entry. A `ttl` of `None` means the entry never
    /// expires.
    pub(super) fn new(value: V, ttl: Option<Duration>, now: Instant) -> Self {
        Self { value, created_at: now, ttl, access_count: 0, last_accessed: now }
    }

    /// True iff a TTL is set and strictly more than it has elapsed since
    /// creation. A zero TTL therefore expires after any non-zero delay.
    pub(super) fn is_expired(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.duration_since(self.created_at) > ttl,
            None => false,
        }
    }

    /// Record a successful read at `now`.
    pub(super) fn touch(&mut self, now: Instant) {
        self.access_count += 1;
        self.last_accessed = now;
    }
}
