//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ProductCommand, ProductQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub products: Arc<dyn ProductQuery>,
    pub product_commands: Arc<dyn ProductCommand>,
}

impl HttpState {
    /// Construct state from the read and write ports.
    ///
    /// A single service usually implements both; pass it twice.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use product_service::domain::CatalogService;
    /// use product_service::inbound::http::state::HttpState;
    /// use product_service::test_support::{InMemoryProductCache, InMemoryProductRepository};
    ///
    /// let service = Arc::new(CatalogService::new(
    ///     Arc::new(InMemoryProductRepository::default()),
    ///     Arc::new(InMemoryProductCache::default()),
    /// ));
    /// let state = HttpState::new(service.clone(), service);
    /// let _reads = state.products.clone();
    /// ```
    pub fn new(products: Arc<dyn ProductQuery>, product_commands: Arc<dyn ProductCommand>) -> Self {
        Self {
            products,
            product_commands,
        }
    }
}
