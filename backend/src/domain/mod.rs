//! Domain primitives, ports and services for the product catalog.
//!
//! Purpose: define the strongly typed catalog model, the ports adapters must
//! implement, and the service that keeps the cache consistent with the store.
//! Nothing here depends on HTTP, Diesel or Redis.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Product and its validated field types.
//! - InvalidationPlan: cache keys made stale by a write.
//! - CatalogService: implementation of the driving ports.

pub mod catalog_service;
pub mod error;
pub mod invalidation;
pub mod ports;
pub mod product;
pub mod trace_id;

pub use self::catalog_service::{CatalogService, DEFAULT_CACHE_TTL};
pub use self::error::{Error, ErrorCode};
pub use self::invalidation::InvalidationPlan;
pub use self::product::{
    CATEGORY_MAX, Category, NewProduct, PRODUCT_NAME_MAX, Price, Product, ProductChange,
    ProductChanges, ProductChangesError, ProductField, ProductId, ProductName,
    ProductValidationError, validate_description,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
