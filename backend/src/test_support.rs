//! In-memory port doubles shared by unit, doc and integration tests.
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature so that
//! `backend/tests/` can drive the full HTTP surface without PostgreSQL or
//! Redis.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    CatalogCacheKey, ProductCache, ProductCacheError, ProductRepository, ProductRepositoryError,
};
use crate::domain::{Category, NewProduct, Product, ProductChanges, ProductId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct StoreState {
    rows: BTreeMap<ProductId, Product>,
    next_id: i64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// `ProductRepository` backed by an ordered map.
///
/// Ids are assigned sequentially from 1 and never reused, matching an
/// identity column.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    state: Mutex<StoreState>,
    unavailable: AtomicBool,
}

impl InMemoryProductRepository {
    /// Make every subsequent call fail with a connection error, or recover.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored products.
    pub fn len(&self) -> usize {
        lock(&self.state).rows.len()
    }

    /// Whether the store holds no products.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every stored product ordered by id.
    pub fn snapshot(&self) -> Vec<Product> {
        lock(&self.state).rows.values().cloned().collect()
    }

    fn check_available(&self) -> Result<(), ProductRepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(ProductRepositoryError::connection("in-memory store offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        self.check_available()?;
        Ok(self.snapshot())
    }

    async fn list_by_category(
        &self,
        category: &Category,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        self.check_available()?;
        Ok(lock(&self.state)
            .rows
            .values()
            .filter(|product| product.category.as_ref() == Some(category))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        self.check_available()?;
        Ok(lock(&self.state).rows.get(&id).cloned())
    }

    async fn insert(&self, product: &NewProduct) -> Result<Product, ProductRepositoryError> {
        self.check_available()?;
        let mut state = lock(&self.state);
        let id = ProductId::new(state.next_id);
        state.next_id += 1;
        let now = Utc::now();
        let stored = Product {
            id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            category: product.category.clone(),
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        self.check_available()?;
        let mut state = lock(&self.state);
        let Some(existing) = state.rows.get_mut(&id) else {
            return Ok(None);
        };
        *existing = existing.with_changes(changes, Utc::now());
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, ProductRepositoryError> {
        self.check_available()?;
        Ok(lock(&self.state).rows.remove(&id).is_some())
    }
}

/// `ProductCache` backed by a hash map that records every delete.
///
/// Entries never expire; the TTL passed to `set` is remembered so tests can
/// assert on it.
#[derive(Debug, Default)]
pub struct InMemoryProductCache {
    entries: Mutex<HashMap<String, (String, Duration)>>,
    deleted: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl InMemoryProductCache {
    /// Make every subsequent call fail with a backend error, or recover.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Raw payload stored under `key`.
    pub fn payload(&self, key: &str) -> Option<String> {
        lock(&self.entries)
            .get(key)
            .map(|(payload, _)| payload.clone())
    }

    /// TTL recorded for `key`.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        lock(&self.entries).get(key).map(|(_, ttl)| *ttl)
    }

    /// Whether `key` currently holds a payload.
    pub fn contains(&self, key: &str) -> bool {
        lock(&self.entries).contains_key(key)
    }

    /// Seed `key` directly, bypassing the port.
    pub fn insert_raw(&self, key: &str, payload: &str) {
        lock(&self.entries).insert(key.to_owned(), (payload.to_owned(), Duration::ZERO));
    }

    /// Keys passed to `delete`, in call order, draining the log.
    pub fn take_deleted(&self) -> Vec<String> {
        std::mem::take(&mut *lock(&self.deleted))
    }

    fn check_available(&self) -> Result<(), ProductCacheError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(ProductCacheError::backend("in-memory cache offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProductCache for InMemoryProductCache {
    async fn get(&self, key: &CatalogCacheKey) -> Result<Option<String>, ProductCacheError> {
        self.check_available()?;
        Ok(self.payload(key.as_str()))
    }

    async fn set(
        &self,
        key: &CatalogCacheKey,
        payload: &str,
        ttl: Duration,
    ) -> Result<(), ProductCacheError> {
        self.check_available()?;
        lock(&self.entries).insert(key.as_str().to_owned(), (payload.to_owned(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &CatalogCacheKey) -> Result<(), ProductCacheError> {
        lock(&self.deleted).push(key.as_str().to_owned());
        self.check_available()?;
        lock(&self.entries).remove(key.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Price, ProductChange, ProductName};
    use rstest::rstest;

    fn new_product(name: &str, category: Option<&str>) -> NewProduct {
        NewProduct {
            name: ProductName::new(name).expect("valid name"),
            description: None,
            price: Price::new(1.5).expect("valid price"),
            category: category.map(|value| Category::new(value).expect("valid category")),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn repository_assigns_sequential_ids_and_filters_by_category() {
        let repo = InMemoryProductRepository::default();
        let first = repo.insert(&new_product("a", Some("A"))).await.expect("insert");
        let second = repo.insert(&new_product("b", Some("B"))).await.expect("insert");
        assert_eq!(first.id.get(), 1);
        assert_eq!(second.id.get(), 2);

        let category = Category::new("B").expect("valid category");
        let listed = repo.list_by_category(&category).await.expect("list");
        assert_eq!(listed, vec![second]);
    }

    #[rstest]
    #[tokio::test]
    async fn repository_update_and_delete_report_absence() {
        let repo = InMemoryProductRepository::default();
        let changes = ProductChanges::new(vec![ProductChange::Price(
            Price::new(2.0).expect("valid price"),
        )])
        .expect("non-empty changes");

        assert!(repo.update(ProductId::new(9), &changes).await.expect("update").is_none());
        assert!(!repo.delete(ProductId::new(9)).await.expect("delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn unavailable_repository_returns_connection_errors() {
        let repo = InMemoryProductRepository::default();
        repo.set_unavailable(true);
        let error = repo.list_all().await.expect_err("store offline");
        assert!(matches!(error, ProductRepositoryError::Connection { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn cache_records_deletes_even_when_failing() {
        let cache = InMemoryProductCache::default();
        cache.set_failing(true);
        let key = CatalogCacheKey::all_products();

        assert!(cache.delete(&key).await.is_err());
        assert_eq!(cache.take_deleted(), vec!["products:all".to_owned()]);
        assert!(cache.take_deleted().is_empty());
    }
}
