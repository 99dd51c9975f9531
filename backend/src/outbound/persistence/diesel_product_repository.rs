//! PostgreSQL-backed `ProductRepository` implementation using Diesel ORM.
//!
//! Each port call checks out one pooled connection and issues a single
//! statement. Updates and inserts use `RETURNING` so the row handed back is
//! exactly what the store committed.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{
    Category, NewProduct, Price, Product, ProductChange, ProductChanges, ProductId, ProductName,
    ProductValidationError,
};

use super::models::{NewProductRow, ProductChangeset, ProductRow};
use super::pool::{DbPool, StorePoolError};
use super::schema::products;

/// Diesel-backed implementation of the `ProductRepository` port.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: StorePoolError) -> ProductRepositoryError {
    ProductRepositoryError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> ProductRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => ProductRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => ProductRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ProductRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            ProductRepositoryError::query("product violates a table constraint")
        }
        _ => ProductRepositoryError::query("database error"),
    }
}

/// Convert a database row into a domain product, re-validating every field.
fn row_to_product(row: ProductRow) -> Result<Product, ProductRepositoryError> {
    let id = row.id;
    let invalid = |error: ProductValidationError| {
        ProductRepositoryError::query(format!("stored product {id} is invalid: {error}"))
    };
    Ok(Product {
        id: ProductId::new(id),
        name: ProductName::new(row.name).map_err(invalid)?,
        description: row.description,
        price: Price::new(row.price).map_err(invalid)?,
        category: row.category.map(Category::new).transpose().map_err(invalid)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn changeset_for(changes: &ProductChanges) -> ProductChangeset<'_> {
    let mut changeset = ProductChangeset {
        updated_at: Some(Utc::now()),
        ..ProductChangeset::default()
    };
    for change in changes.iter() {
        match change {
            ProductChange::Name(name) => changeset.name = Some(name.as_str()),
            ProductChange::Description(description) => {
                changeset.description = Some(description.as_str());
            }
            ProductChange::Price(price) => changeset.price = Some(price.get()),
            ProductChange::Category(category) => changeset.category = Some(category.as_str()),
        }
    }
    changeset
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProductRow> = products::table
            .order(products::id.asc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_product).collect()
    }

    async fn list_by_category(
        &self,
        category: &Category,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProductRow> = products::table
            .filter(products::category.eq(category.as_str()))
            .order(products::id.asc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_product).collect()
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProductRow> = products::table
            .find(id.get())
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_product).transpose()
    }

    async fn insert(&self, product: &NewProduct) -> Result<Product, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewProductRow {
            name: product.name.as_str(),
            description: product.description.as_deref(),
            price: product.price.get(),
            category: product.category.as_ref().map(Category::as_str),
        };

        let row: ProductRow = diesel::insert_into(products::table)
            .values(&new_row)
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_product(row)
    }

    async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProductRow> = diesel::update(products::table.find(id.get()))
            .set(&changeset_for(changes))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_product).transpose()
    }

    async fn delete(&self, id: ProductId) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(products::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
