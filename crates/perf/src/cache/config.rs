//! Cache configuration and builder.

use std::time::Duration;

/// Configuration for a [`Cache`](super::Cache).
///
/// Validating the parameters is the constructing caller's responsibility;
/// a zero `max_size` cache never retains anything.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries.
    pub max_size: usize,

    /// TTL applied to entries inserted without an explicit one
    /// (`None` = entries never expire by default).
    pub default_ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_size: 1000, default_ttl: None }
    }
}

impl CacheConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    /// Preset for a size-bounded cache without default expiration.
    pub fn bounded(max_size: usize) -> Self {
        Self { max_size, default_ttl: None }
    }

    /// Preset combining a size bound with a default TTL.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    ///
    /// use pitwall_perf::cache::CacheConfig;
    ///
    /// let config = CacheConfig::bounded_ttl(500, Duration::from_secs(3600));
    /// ```
    pub fn bounded_ttl(max_size: usize, default_ttl: Duration) -> Self {
        Self { max_size, default_ttl: Some(default_ttl) }
    }
}

/// Builder for [`CacheConfig`] with a fluent API.
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of entries.
    pub fn max_size(mut self, size: usize) -> Self {
        self.config.max_size = size;
        self
    }

    /// Set the default time-to-live for entries.
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.config.default_ttl = Some(ttl);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> CacheConfig {
        self.config
    }
}
