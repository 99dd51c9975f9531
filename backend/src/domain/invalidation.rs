//! Cache keys made stale by each kind of catalog write.
//!
//! Plans are pure values so the protocol can be checked without a cache.
//! Keys appear in a fixed order and never twice.

use crate::domain::ports::CatalogCacheKey;
use crate::domain::{Category, Product, ProductId};

/// Ordered, duplicate-free set of cache keys to delete after a write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationPlan {
    keys: Vec<CatalogCacheKey>,
}

impl InvalidationPlan {
    /// Keys stale after `created` was inserted.
    ///
    /// The aggregator's full listing embeds every product, so a create must
    /// drop it too.
    #[must_use]
    pub fn for_create(created: &Product) -> Self {
        let mut plan = Self::default();
        plan.push(CatalogCacheKey::all_products());
        plan.push(CatalogCacheKey::gateway_products_full());
        if let Some(category) = created.category.as_ref() {
            plan.push(CatalogCacheKey::category(category));
        }
        plan
    }

    /// Keys stale after updating product `id`.
    ///
    /// `old_category` is the category read before the update ran. Its list is
    /// dropped even when the update left the category alone; the list for
    /// `new_category` is dropped whenever the update assigned one.
    #[must_use]
    pub fn for_update(
        id: ProductId,
        old_category: Option<&Category>,
        new_category: Option<&Category>,
    ) -> Self {
        let mut plan = Self::default();
        plan.push(CatalogCacheKey::product(id));
        plan.push(CatalogCacheKey::all_products());
        if let Some(category) = old_category {
            plan.push(CatalogCacheKey::category(category));
        }
        if let Some(category) = new_category {
            plan.push(CatalogCacheKey::category(category));
        }
        plan
    }

    /// Keys stale after deleting product `id`.
    ///
    /// The category list is not touched: the row is never read on delete, so
    /// `products:all:{category}` keeps the product until its TTL lapses.
    #[must_use]
    pub fn for_delete(id: ProductId) -> Self {
        let mut plan = Self::default();
        plan.push(CatalogCacheKey::product(id));
        plan.push(CatalogCacheKey::all_products());
        plan
    }

    /// Keys in deletion order.
    #[must_use]
    pub fn keys(&self) -> &[CatalogCacheKey] {
        &self.keys
    }

    fn push(&mut self, key: CatalogCacheKey) {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }
}
