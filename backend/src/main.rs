//! Product service entry-point: loads configuration, prepares the store and
//! cache pools, and serves the catalog over HTTP.

mod server;

use std::net::{SocketAddr, ToSocketAddrs};

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use product_service::ServiceSettings;
use product_service::inbound::http::health::HealthState;
use product_service::outbound::cache::{CacheConfig, CachePool};
use product_service::outbound::persistence::{DbPool, StorePoolOptions, run_pending_migrations};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;

    if settings.run_migrations() {
        let applied = run_pending_migrations(settings.database_url())
            .await
            .wrap_err("failed to apply database migrations")?;
        info!(count = applied.len(), "database migrations checked");
    }

    let db_pool = DbPool::connect(StorePoolOptions::from_settings(&settings))
        .await
        .wrap_err("failed to build database pool")?;

    let cache_pool = settings
        .cache_url()
        .map(|url| {
            CachePool::new(CacheConfig::new(url).with_max_size(settings.cache_max_connections()))
        })
        .transpose()
        .wrap_err("failed to build cache pool")?;

    let bind_addr = resolve_bind_addr(settings.host(), settings.port())?;
    let config = ServerConfig::new(bind_addr, db_pool)
        .with_cache_pool(cache_pool)
        .with_cache_ttl(settings.cache_ttl());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "product service listening");

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        shutdown_signal().await;
        health_state.mark_unhealthy();
        info!("shutdown requested; draining connections");
        handle.stop(true).await;
    });

    server.await.wrap_err("server terminated unexpectedly")?;
    info!("product service stopped");
    Ok(())
}

fn resolve_bind_addr(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .wrap_err_with(|| format!("invalid bind address {host}:{port}"))?
        .next()
        .ok_or_else(|| eyre!("bind address {host}:{port} resolved to nothing"))
}

/// Wait for Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
