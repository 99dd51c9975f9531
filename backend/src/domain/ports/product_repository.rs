//! Driven port for the relational product store.
//!
//! Every operation is a single atomic round trip. Absence is reported through
//! `Option`/`bool` rather than an error so the service decides how to surface
//! it.

use async_trait::async_trait;

use crate::domain::{Category, NewProduct, Product, ProductChanges, ProductId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by the product store adapter.
    pub enum ProductRepositoryError {
        /// The store could not be reached or a connection could not be
        /// checked out of the pool.
        Connection => "product store connection failed: {message}",
        /// A statement failed during execution or row conversion.
        Query => "product store query failed: {message}",
    }
}

/// Port for reading and writing product rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every product, ordered by id.
    async fn list_all(&self) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Products in `category`, ordered by id.
    async fn list_by_category(
        &self,
        category: &Category,
    ) -> Result<Vec<Product>, ProductRepositoryError>;

    /// The product with `id`, if it exists.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, ProductRepositoryError>;

    /// Insert a product and return the stored row with its assigned id.
    async fn insert(&self, product: &NewProduct) -> Result<Product, ProductRepositoryError>;

    /// Apply `changes` to the product with `id` and return the updated row,
    /// or `None` when no such product exists.
    async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, ProductRepositoryError>;

    /// Delete the product with `id`; `true` when a row was removed.
    async fn delete(&self, id: ProductId) -> Result<bool, ProductRepositoryError>;
}
