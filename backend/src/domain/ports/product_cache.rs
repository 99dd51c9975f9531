//! Driven port for the key/value cache store.
//!
//! The cache holds opaque serialised payloads. It offers no consistency help
//! of its own; the catalog service decides what to populate and what to
//! invalidate.

use std::time::Duration;

use async_trait::async_trait;

use super::{CatalogCacheKey, define_port_error};

define_port_error! {
    /// Errors raised by the cache adapter.
    pub enum ProductCacheError {
        /// Cache backend is unavailable or timing out.
        Backend => "product cache backend failure: {message}",
    }
}

/// Port for GET / SET-with-expiry / DELETE against the cache store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCache: Send + Sync {
    /// Read the payload stored under `key`.
    async fn get(&self, key: &CatalogCacheKey) -> Result<Option<String>, ProductCacheError>;

    /// Store `payload` under `key`, expiring after `ttl`.
    async fn set(
        &self,
        key: &CatalogCacheKey,
        payload: &str,
        ttl: Duration,
    ) -> Result<(), ProductCacheError>;

    /// Remove `key`. Deleting an absent key succeeds.
    async fn delete(&self, key: &CatalogCacheKey) -> Result<(), ProductCacheError>;
}
