//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`ProductRepository`, `ProductCache`) are implemented by the
//! outbound adapters; driving ports (`ProductQuery`, `ProductCommand`) are
//! implemented by the catalog service and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod product_cache;
mod product_command;
mod product_query;
mod product_repository;

pub use cache_key::CatalogCacheKey;
#[cfg(test)]
pub use product_cache::MockProductCache;
pub use product_cache::{ProductCache, ProductCacheError};
#[cfg(test)]
pub use product_command::MockProductCommand;
pub use product_command::ProductCommand;
#[cfg(test)]
pub use product_query::MockProductQuery;
pub use product_query::{ProductListFilter, ProductQuery};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{ProductRepository, ProductRepositoryError};
