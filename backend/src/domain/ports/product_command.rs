//! Driving port for catalog mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewProduct, Product, ProductChanges, ProductId};

/// Write-side use cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCommand: Send + Sync {
    /// Create a product and return it with its assigned id.
    async fn create_product(&self, product: NewProduct) -> Result<Product, Error>;

    /// Apply a partial update; `NotFound` when the product is absent.
    async fn update_product(&self, id: ProductId, changes: ProductChanges)
    -> Result<Product, Error>;

    /// Delete a product; `NotFound` when the product is absent.
    async fn delete_product(&self, id: ProductId) -> Result<(), Error>;
}
