//! Cache configuration.

use std::time::Duration;

const DEFAULT_ENTRY_TTL_SECS: u64 = 60;
const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 2000;
const DEFAULT_POOL_SIZE: usize = 16;

/// Runtime knobs shared by the cache stores and the catalog read path.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Redis connection string; `None` selects the in-process store.
    pub redis_url: Option<String>,
    /// Lifetime of a cached manga snapshot.
    pub entry_ttl: Duration,
    /// Upper bound for a single cache round trip.
    pub operation_timeout: Duration,
    /// Maximum pooled Redis connections.
    pub pool_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            entry_ttl: Duration::from_secs(DEFAULT_ENTRY_TTL_SECS),
            operation_timeout: Duration::from_millis(DEFAULT_OPERATION_TIMEOUT_MS),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            redis_url: settings.redis_url.clone(),
            entry_ttl: settings.ttl,
            operation_timeout: settings.operation_timeout,
            pool_size: settings.pool_size.get() as usize,
        }
    }
}
