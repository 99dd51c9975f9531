//! Connection pool for the product store.
//!
//! Sized from [`ServiceSettings`] at startup and shared by clone with the
//! repository. A checkout that outlives the configured wait is reported as
//! [`StorePoolError::Exhausted`] so callers can tell a saturated pool from a
//! refused connection.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection, RunError};
use tracing::warn;

use crate::settings::ServiceSettings;

/// Failures raised while building or drawing from the store pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorePoolError {
    /// The initial idle connections could not be opened.
    #[error("product store pool could not start: {message}")]
    Startup { message: String },
    /// Every connection stayed busy for the whole checkout wait.
    #[error("no product store connection free after {waited:?}")]
    Exhausted { waited: Duration },
    /// Opening a fresh connection failed.
    #[error("product store refused connection: {message}")]
    Refused { message: String },
}

/// Pool sizing taken from the service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePoolOptions {
    database_url: String,
    max_connections: u32,
    min_idle: u32,
    checkout_wait: Duration,
}

impl StorePoolOptions {
    /// Read the store URL, pool bounds, and checkout wait from `settings`.
    /// `min_idle` is clamped so it never exceeds the pool size.
    pub fn from_settings(settings: &ServiceSettings) -> Self {
        let max_connections = settings.db_max_connections().max(1);
        Self {
            database_url: settings.database_url().to_owned(),
            max_connections,
            min_idle: settings.db_min_idle().min(max_connections),
            checkout_wait: settings.db_checkout_timeout(),
        }
    }
}

/// Shared handle to the product store connections.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
    checkout_wait: Duration,
}

impl DbPool {
    /// Open the pool and fill its idle set.
    ///
    /// # Errors
    ///
    /// Returns [`StorePoolError::Startup`] when the idle connections cannot
    /// be established.
    pub async fn connect(options: StorePoolOptions) -> Result<Self, StorePoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(options.database_url);
        let inner = Pool::builder()
            .max_size(options.max_connections)
            .min_idle(Some(options.min_idle))
            .connection_timeout(options.checkout_wait)
            .build(manager)
            .await
            .map_err(|err| StorePoolError::Startup {
                message: err.to_string(),
            })?;
        Ok(Self {
            inner,
            checkout_wait: options.checkout_wait,
        })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`StorePoolError::Exhausted`] when the wait elapses and
    /// [`StorePoolError::Refused`] when a new connection cannot be opened.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, StorePoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| checkout_error(err, self.checkout_wait))
    }
}

fn checkout_error(error: RunError, waited: Duration) -> StorePoolError {
    match error {
        RunError::TimedOut => {
            warn!(?waited, "product store pool exhausted");
            StorePoolError::Exhausted { waited }
        }
        RunError::User(err) => StorePoolError::Refused {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn settings(max: Option<u32>, min_idle: Option<u32>) -> ServiceSettings {
        ServiceSettings {
            database_url: Some("postgres://db/products".to_owned()),
            redis_url: None,
            cache_enabled: None,
            host: None,
            port: None,
            db_max_connections: max,
            db_min_idle: min_idle,
            db_checkout_timeout_seconds: Some(5),
            cache_max_connections: None,
            cache_ttl_seconds: None,
            run_migrations: None,
        }
    }

    #[rstest]
    fn options_follow_settings() {
        let options = StorePoolOptions::from_settings(&settings(Some(20), Some(4)));
        assert_eq!(
            options,
            StorePoolOptions {
                database_url: "postgres://db/products".to_owned(),
                max_connections: 20,
                min_idle: 4,
                checkout_wait: Duration::from_secs(5),
            }
        );
    }

    #[rstest]
    #[case(Some(3), Some(8), 3, 3)]
    #[case(Some(0), Some(2), 1, 1)]
    #[case(None, None, 10, 2)]
    fn idle_set_never_exceeds_pool_size(
        #[case] max: Option<u32>,
        #[case] min_idle: Option<u32>,
        #[case] expected_max: u32,
        #[case] expected_idle: u32,
    ) {
        let options = StorePoolOptions::from_settings(&settings(max, min_idle));
        assert_eq!(options.max_connections, expected_max);
        assert_eq!(options.min_idle, expected_idle);
    }

    #[rstest]
    fn timed_out_checkout_reports_the_wait() {
        let error = checkout_error(RunError::TimedOut, Duration::from_secs(5));
        assert_eq!(
            error,
            StorePoolError::Exhausted {
                waited: Duration::from_secs(5)
            }
        );
        assert!(error.to_string().contains("5s"));
    }
}
