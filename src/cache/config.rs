//! Cache configuration.

use std::time::Duration;

/// Configuration for a cache instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Time-to-live for cache entries.
    pub ttl: Option<Duration>,

    /// Time-to-idle for cache entries.
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)), // 5 minutes
            tti: None,
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with the given max capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            ..Default::default()
        }
    }

    /// Set time-to-live for cache entries.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    /// Tenant settings, read on every message.
    pub fn tenant_settings() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)), // 5 minutes
            tti: None,
        }
    }

    /// Admin status entries. Moka only evicts; freshness is checked by the
    /// caller against its own TTL, so entries live a few TTLs longer.
    pub fn admin_status(freshness: Duration) -> Self {
        Self::with_capacity(10_000).ttl(freshness.saturating_mul(5))
    }

    /// Per-tenant word lists. Invalidated explicitly on add/remove.
    pub fn word_lists() -> Self {
        Self {
            max_capacity: 5_000,
            ttl: Some(Duration::from_secs(600)), // 10 minutes
            tti: Some(Duration::from_secs(300)), // 5 minutes idle
        }
    }
}
