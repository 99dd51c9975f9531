//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! - **Thin adapters**: the repository only translates between Diesel rows
//!   and domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Async pooling**: connections come from a `bb8` pool through
//!   `diesel-async`.
//!
//! # Example
//!
//! ```no_run
//! use product_service::ServiceSettings;
//! use product_service::outbound::persistence::{
//!     DbPool, DieselProductRepository, StorePoolOptions,
//! };
//!
//! # async fn build(settings: &ServiceSettings) -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::connect(StorePoolOptions::from_settings(settings)).await?;
//! let repo = DieselProductRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_product_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_product_repository::DieselProductRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, StorePoolError, StorePoolOptions};
