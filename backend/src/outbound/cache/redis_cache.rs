//! Redis-backed `ProductCache` adapter.
//!
//! Connections come from a `bb8-redis` pool built without an eager connect,
//! so an unreachable Redis delays nothing at startup; each port call then
//! fails fast with [`ProductCacheError::Backend`] once the checkout timeout
//! lapses.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::{RedisConnectionManager, redis};

use crate::domain::ports::{CatalogCacheKey, ProductCache, ProductCacheError};

/// Errors raised while building or using the cache pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CachePoolError {
    /// The pool could not be configured, usually an unparsable URL.
    #[error("failed to build cache pool: {message}")]
    Build { message: String },
    /// No connection could be checked out in time.
    #[error("failed to get cache connection: {message}")]
    Checkout { message: String },
}

/// Configuration for the cache connection pool.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    redis_url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl CacheConfig {
    /// Create a configuration for `redis_url` with 10 connections and a five
    /// second checkout timeout.
    pub fn new(redis_url: impl Into<String>) -> Self {
        Self {
            redis_url: redis_url.into(),
            max_size: 10,
            connection_timeout: Duration::from_secs(5),
        }
    }

    /// Set the maximum number of pooled connections.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the checkout timeout.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Redis URL the pool connects to.
    #[must_use]
    pub fn redis_url(&self) -> &str {
        &self.redis_url
    }
}

/// Connection pool for the cache store.
#[derive(Clone)]
pub struct CachePool {
    inner: Pool<RedisConnectionManager>,
}

impl CachePool {
    /// Build a pool from `config` without opening any connection yet.
    ///
    /// # Errors
    ///
    /// Returns [`CachePoolError::Build`] when the URL cannot be parsed.
    pub fn new(config: CacheConfig) -> Result<Self, CachePoolError> {
        let manager =
            RedisConnectionManager::new(config.redis_url.as_str()).map_err(|err| {
                CachePoolError::Build {
                    message: err.to_string(),
                }
            })?;
        let inner = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build_unchecked(manager);
        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`CachePoolError::Checkout`] when Redis cannot be reached
    /// within the configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, RedisConnectionManager>, CachePoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| CachePoolError::Checkout {
                message: err.to_string(),
            })
    }
}

/// `ProductCache` adapter issuing GET, SET EX and DEL against Redis.
#[derive(Clone)]
pub struct RedisProductCache {
    pool: CachePool,
}

impl RedisProductCache {
    /// Create an adapter over `pool`.
    pub fn new(pool: CachePool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, ProductCacheError> {
        self.pool
            .get()
            .await
            .map_err(|err| ProductCacheError::backend(err.to_string()))
    }
}

fn map_redis_error(error: &redis::RedisError) -> ProductCacheError {
    ProductCacheError::backend(error.to_string())
}

/// Redis rejects `EX 0`; round sub-second lifetimes up to one second.
fn expiry_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl ProductCache for RedisProductCache {
    async fn get(&self, key: &CatalogCacheKey) -> Result<Option<String>, ProductCacheError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = redis::cmd("GET")
            .arg(key.as_str())
            .query_async(&mut *conn)
            .await
            .map_err(|err| map_redis_error(&err))?;
        Ok(value)
    }

    async fn set(
        &self,
        key: &CatalogCacheKey,
        payload: &str,
        ttl: Duration,
    ) -> Result<(), ProductCacheError> {
        let mut conn = self.connection().await?;
        redis::cmd("SET")
            .arg(key.as_str())
            .arg(payload)
            .arg("EX")
            .arg(expiry_seconds(ttl))
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|err| map_redis_error(&err))
    }

    async fn delete(&self, key: &CatalogCacheKey) -> Result<(), ProductCacheError> {
        let mut conn = self.connection().await?;
        redis::cmd("DEL")
            .arg(key.as_str())
            .query_async::<i64>(&mut *conn)
            .await
            .map(|_removed| ())
            .map_err(|err| map_redis_error(&err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn cache_config_defaults() {
        let config = CacheConfig::new("redis://localhost:6379");
        assert_eq!(config.redis_url(), "redis://localhost:6379");
        assert_eq!(config.max_size, 10);
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
    }

    #[rstest]
    fn unparsable_url_fails_to_build() {
        let result = CachePool::new(CacheConfig::new("not a redis url"));
        assert!(matches!(result, Err(CachePoolError::Build { .. })));
    }

    #[rstest]
    #[case(Duration::from_secs(300), 300)]
    #[case(Duration::from_millis(200), 1)]
    fn expiry_is_at_least_one_second(#[case] ttl: Duration, #[case] expected: u64) {
        assert_eq!(expiry_seconds(ttl), expected);
    }

    #[tokio::test]
    async fn unreachable_redis_surfaces_backend_error() {
        // Port 1 is reserved and refuses connections.
        let pool = CachePool::new(
            CacheConfig::new("redis://127.0.0.1:1")
                .with_connection_timeout(Duration::from_millis(200)),
        )
        .expect("valid url");
        let cache = RedisProductCache::new(pool);

        let error = cache
            .get(&CatalogCacheKey::all_products())
            .await
            .expect_err("no redis listening");
        assert!(matches!(error, ProductCacheError::Backend { .. }));
    }
}
