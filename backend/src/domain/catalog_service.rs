//! Cache-consistent catalog service.
//!
//! Reads are cache-aside: probe the cache, fall back to the store on a miss,
//! then populate the cache with a fixed TTL. Writes go to the store first and,
//! only once the store has committed, delete every cache key the write made
//! stale (see [`InvalidationPlan`]). The cache never writes on the mutation
//! path.
//!
//! The cache is advisory. Probe, populate and invalidate failures are logged
//! and swallowed; the store remains the source of truth and responses never
//! depend on cache availability.
//!
//! A read that misses concurrently with a committing write may repopulate the
//! cache with the pre-write state after the write's invalidation ran. That
//! window is bounded by the TTL and is accepted.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::invalidation::InvalidationPlan;
use crate::domain::ports::{
    CatalogCacheKey, ProductCache, ProductCommand, ProductListFilter, ProductQuery,
    ProductRepository, ProductRepositoryError,
};
use crate::domain::{Error, NewProduct, Product, ProductChanges, ProductId};

/// Lifetime of every entry this service writes to the cache.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Catalog service implementing the [`ProductQuery`] and [`ProductCommand`]
/// driving ports over a store and a cache.
pub struct CatalogService<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
    ttl: Duration,
}

impl<R, C> Clone for CatalogService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: Arc::clone(&self.cache),
            ttl: self.ttl,
        }
    }
}

impl<R, C> CatalogService<R, C> {
    /// Create a service caching entries for [`DEFAULT_CACHE_TTL`].
    pub fn new(repository: Arc<R>, cache: Arc<C>) -> Self {
        Self {
            repository,
            cache,
            ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Override the cache entry lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Lifetime applied to cache entries.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<R, C> CatalogService<R, C>
where
    R: ProductRepository,
    C: ProductCache,
{
    fn map_repository_error(error: ProductRepositoryError) -> Error {
        match error {
            ProductRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("product store unavailable: {message}"))
            }
            ProductRepositoryError::Query { message } => {
                Error::internal(format!("product store error: {message}"))
            }
        }
    }

    fn product_not_found(id: ProductId) -> Error {
        Error::not_found("Product not found").with_details(json!({ "id": id.get() }))
    }

    /// Decode the entry under `key`. Backend failures and undecodable
    /// payloads both count as a miss.
    async fn cached<T>(&self, key: &CatalogCacheKey) -> Option<T>
    where
        T: DeserializeOwned,
    {
        match self.cache.get(key).await {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(value) => {
                    debug!(key = %key, "catalog cache hit");
                    Some(value)
                }
                Err(error) => {
                    warn!(key = %key, %error, "discarding undecodable catalog cache entry");
                    None
                }
            },
            Ok(None) => {
                debug!(key = %key, "catalog cache miss");
                None
            }
            Err(error) => {
                warn!(key = %key, %error, "catalog cache read failed; using store");
                None
            }
        }
    }

    async fn populate<T>(&self, key: &CatalogCacheKey, value: &T)
    where
        T: Serialize + Sync + ?Sized,
    {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(key = %key, %error, "failed to serialise catalog cache entry");
                return;
            }
        };
        if let Err(error) = self.cache.set(key, &payload, self.ttl).await {
            warn!(key = %key, %error, "catalog cache populate failed");
        }
    }

    async fn invalidate(&self, plan: &InvalidationPlan) {
        for key in plan.keys() {
            if let Err(error) = self.cache.delete(key).await {
                warn!(
                    key = %key,
                    %error,
                    "catalog cache invalidation failed; entry stays until its TTL lapses"
                );
            }
        }
    }
}

#[async_trait]
impl<R, C> ProductQuery for CatalogService<R, C>
where
    R: ProductRepository,
    C: ProductCache,
{
    async fn list_products(&self, filter: &ProductListFilter) -> Result<Vec<Product>, Error> {
        let key = CatalogCacheKey::product_list(filter.category.as_ref());
        if let Some(products) = self.cached::<Vec<Product>>(&key).await {
            return Ok(products);
        }

        let products = match filter.category.as_ref() {
            Some(category) => self.repository.list_by_category(category).await,
            None => self.repository.list_all().await,
        }
        .map_err(Self::map_repository_error)?;

        self.populate(&key, &products).await;
        Ok(products)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, Error> {
        let key = CatalogCacheKey::product(id);
        if let Some(product) = self.cached::<Product>(&key).await {
            return Ok(product);
        }

        let product = self
            .repository
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::product_not_found(id))?;

        self.populate(&key, &product).await;
        Ok(product)
    }
}

#[async_trait]
impl<R, C> ProductCommand for CatalogService<R, C>
where
    R: ProductRepository,
    C: ProductCache,
{
    async fn create_product(&self, product: NewProduct) -> Result<Product, Error> {
        let created = self
            .repository
            .insert(&product)
            .await
            .map_err(Self::map_repository_error)?;

        self.invalidate(&InvalidationPlan::for_create(&created)).await;
        info!(product_id = %created.id, "product created");
        Ok(created)
    }

    async fn update_product(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, Error> {
        // The old category bucket is only knowable before the write lands.
        let existing = self
            .repository
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::product_not_found(id))?;

        let updated = self
            .repository
            .update(id, &changes)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::product_not_found(id))?;

        let plan = InvalidationPlan::for_update(id, existing.category.as_ref(), changes.category());
        self.invalidate(&plan).await;
        info!(product_id = %id, fields = changes.len(), "product updated");
        Ok(updated)
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), Error> {
        let deleted = self
            .repository
            .delete(id)
            .await
            .map_err(Self::map_repository_error)?;
        if !deleted {
            return Err(Self::product_not_found(id));
        }

        self.invalidate(&InvalidationPlan::for_delete(id)).await;
        info!(product_id = %id, "product deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;
