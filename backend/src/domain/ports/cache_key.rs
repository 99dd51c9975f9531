//! Catalog cache key space.
//!
//! ```text
//! product:{id}                 single product
//! products:all                 every product
//! products:all:{category}      products in one category
//! gateway:products_full:all    owned by the downstream aggregator (delete only)
//! ```
//!
//! The aggregator key is a cross-service contract: if the aggregator renames
//! it, [`CatalogCacheKey::gateway_products_full`] must change in lockstep.

use std::fmt;

use crate::domain::{Category, ProductId};

const PRODUCT_PREFIX: &str = "product:";
const ALL_PRODUCTS: &str = "products:all";
const GATEWAY_PRODUCTS_FULL: &str = "gateway:products_full:all";

/// Key addressing one entry in the cache store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogCacheKey(String);

impl CatalogCacheKey {
    /// `product:{id}`.
    #[must_use]
    pub fn product(id: ProductId) -> Self {
        Self(format!("{PRODUCT_PREFIX}{id}"))
    }

    /// `products:all`.
    #[must_use]
    pub fn all_products() -> Self {
        Self(ALL_PRODUCTS.to_owned())
    }

    /// `products:all:{category}`.
    #[must_use]
    pub fn category(category: &Category) -> Self {
        Self(format!("{ALL_PRODUCTS}:{category}"))
    }

    /// List key for an optional category filter.
    #[must_use]
    pub fn product_list(category: Option<&Category>) -> Self {
        category.map_or_else(Self::all_products, Self::category)
    }

    /// `gateway:products_full:all`, the aggregator's cached product listing.
    #[must_use]
    pub fn gateway_products_full() -> Self {
        Self(GATEWAY_PRODUCTS_FULL.to_owned())
    }

    /// Borrow the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CatalogCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CatalogCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
