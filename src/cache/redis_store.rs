//! Redis-backed cache store.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use deadpool_redis::{Config, Pool, PoolConfig, Runtime, Timeouts};
use redis::AsyncCommands;

use super::config::CacheConfig;
use super::store::{CacheError, CacheLookup, CacheStore};

/// Shared Redis cache reached through a deadpool connection pool.
///
/// Every round trip, including checking out a connection, is bounded by the
/// configured operation timeout.
#[derive(Clone)]
pub struct RedisCacheStore {
    pool: Pool,
    timeout: Duration,
}

impl RedisCacheStore {
    pub fn new(pool: Pool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Builds the pool without opening a connection.
    pub fn connect(url: &str, config: &CacheConfig) -> Result<Self, CacheError> {
        let mut redis_config = Config::from_url(url);
        redis_config.pool = Some(PoolConfig {
            max_size: config.pool_size,
            timeouts: Timeouts {
                wait: Some(config.operation_timeout),
                create: Some(config.operation_timeout),
                recycle: Some(config.operation_timeout),
            },
            ..PoolConfig::default()
        });

        let pool = redis_config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| CacheError::Connection(err.to_string()))?;

        Ok(Self::new(pool, config.operation_timeout))
    }

    /// Checks that a pooled connection can be checked out.
    pub async fn ping(&self) -> Result<(), CacheError> {
        self.bounded(async { self.connection().await.map(|_| ()) })
            .await
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection, CacheError> {
        self.pool
            .get()
            .await
            .map_err(|err| CacheError::Connection(err.to_string()))
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        tokio::time::timeout(self.timeout, operation)
            .await
            .map_err(|_| CacheError::Timeout(self.timeout))?
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<CacheLookup, CacheError> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            let value: Option<Vec<u8>> = conn
                .get(key)
                .await
                .map_err(|err| CacheError::Command(err.to_string()))?;
            Ok(match value {
                Some(bytes) => CacheLookup::Hit(Bytes::from(bytes)),
                None => CacheLookup::Miss,
            })
        })
        .await
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        let ttl_secs = ttl.as_secs().max(1);
        self.bounded(async {
            let mut conn = self.connection().await?;
            conn.set_ex::<_, _, ()>(key, value.as_ref(), ttl_secs)
                .await
                .map_err(|err| CacheError::Command(err.to_string()))
        })
        .await
    }
}
