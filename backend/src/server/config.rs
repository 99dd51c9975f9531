//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use product_service::domain::DEFAULT_CACHE_TTL;
use product_service::outbound::cache::CachePool;
use product_service::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) cache_pool: Option<CachePool>,
    pub(crate) cache_ttl: Duration,
}

impl ServerConfig {
    /// Construct a server configuration with caching disabled.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            cache_pool: None,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Attach a Redis pool; without one the catalog runs uncached.
    #[must_use]
    pub fn with_cache_pool(mut self, pool: Option<CachePool>) -> Self {
        self.cache_pool = pool;
        self
    }

    /// Set the lifetime of cache entries.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
