//! Manka cache layer
//!
//! Backs the read-through path for single-manga lookups. Two stores exist:
//!
//! - **redis**: shared across instances, used when `cache.redis_url` is set
//! - **memory**: in-process fallback with the same TTL semantics
//!
//! ```toml
//! [cache]
//! redis_url = "redis://127.0.0.1:6379"
//! ttl_seconds = 60
//! timeout_ms = 2000
//! ```

mod config;
mod keys;
mod redis_store;
mod store;

use std::sync::Arc;

use tracing::{info, warn};

pub use config::CacheConfig;
pub use keys::manga_key;
pub use redis_store::RedisCacheStore;
pub use store::{CacheError, CacheLookup, CacheStore, MemoryCacheStore};

/// Selects the cache store for the process.
///
/// An unreachable Redis falls back to the in-process store so the service
/// can still start.
pub async fn connect(config: &CacheConfig) -> Arc<dyn CacheStore> {
    let Some(url) = config.redis_url.as_deref() else {
        info!(target = "manka::cache", "Redis not configured, using in-process cache");
        return Arc::new(MemoryCacheStore::new());
    };

    let store = match RedisCacheStore::connect(url, config) {
        Ok(store) => store,
        Err(err) => {
            warn!(
                target = "manka::cache",
                error = %err,
                "Failed to create Redis pool, falling back to in-process cache"
            );
            return Arc::new(MemoryCacheStore::new());
        }
    };

    match store.ping().await {
        Ok(()) => {
            info!(target = "manka::cache", "Connected to Redis");
            Arc::new(store)
        }
        Err(err) => {
            warn!(
                target = "manka::cache",
                error = %err,
                "Redis unreachable, falling back to in-process cache"
            );
            Arc::new(MemoryCacheStore::new())
        }
    }
}
