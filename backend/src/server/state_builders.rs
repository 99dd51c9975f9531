//! Builders wiring the catalog service onto the configured adapters.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;

use product_service::domain::CatalogService;
use product_service::domain::ports::{ProductCache, ProductRepository};
use product_service::inbound::http::state::HttpState;
use product_service::outbound::cache::{DisabledProductCache, RedisProductCache};
use product_service::outbound::persistence::DieselProductRepository;
use tracing::info;

use super::ServerConfig;

/// Build the catalog service over one repository and cache, exposing it
/// through both HTTP ports.
fn catalog_state<R, C>(repository: Arc<R>, cache: Arc<C>, ttl: Duration) -> HttpState
where
    R: ProductRepository + 'static,
    C: ProductCache + 'static,
{
    let service = Arc::new(CatalogService::new(repository, cache).with_ttl(ttl));
    HttpState::new(service.clone(), service)
}

/// Build HTTP state from the server configuration.
///
/// Uses the Redis adapter when a cache pool is configured, otherwise the
/// disabled cache so reads always go to the store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let repository = Arc::new(DieselProductRepository::new(config.db_pool.clone()));
    let state = match &config.cache_pool {
        Some(pool) => {
            info!(ttl_secs = config.cache_ttl.as_secs(), "product cache enabled");
            catalog_state(
                repository,
                Arc::new(RedisProductCache::new(pool.clone())),
                config.cache_ttl,
            )
        }
        None => {
            info!("product cache disabled");
            catalog_state(
                repository,
                Arc::new(DisabledProductCache::new()),
                config.cache_ttl,
            )
        }
    };
    web::Data::new(state)
}
