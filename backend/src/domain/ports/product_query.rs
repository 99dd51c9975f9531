//! Driving port for catalog reads.

use async_trait::async_trait;

use crate::domain::{Category, Error, Product, ProductId};

/// Optional filter applied to product listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListFilter {
    pub category: Option<Category>,
}

impl ProductListFilter {
    /// Filter selecting every product.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter selecting products in `category`.
    #[must_use]
    pub fn by_category(category: Category) -> Self {
        Self {
            category: Some(category),
        }
    }
}

/// Read-side use cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductQuery: Send + Sync {
    /// Products matching `filter`, ordered by id.
    async fn list_products(&self, filter: &ProductListFilter) -> Result<Vec<Product>, Error>;

    /// One product; `NotFound` when absent.
    async fn get_product(&self, id: ProductId) -> Result<Product, Error>;
}
