//! Cache adapter used when no Redis is configured.
//!
//! Every read misses and every write succeeds without storing anything, so
//! the catalog service degrades to plain store reads.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::{CatalogCacheKey, ProductCache, ProductCacheError};

/// `ProductCache` that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledProductCache;

impl DisabledProductCache {
    /// Create a new disabled cache.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProductCache for DisabledProductCache {
    async fn get(&self, _key: &CatalogCacheKey) -> Result<Option<String>, ProductCacheError> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &CatalogCacheKey,
        _payload: &str,
        _ttl: Duration,
    ) -> Result<(), ProductCacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &CatalogCacheKey) -> Result<(), ProductCacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn disabled_cache_never_holds_entries() {
        let cache = DisabledProductCache::new();
        let key = CatalogCacheKey::all_products();

        cache
            .set(&key, "[]", Duration::from_secs(300))
            .await
            .expect("set succeeds");
        let result = cache.get(&key).await.expect("get succeeds");
        assert!(result.is_none(), "disabled cache should always miss");
        cache.delete(&key).await.expect("delete succeeds");
    }
}
