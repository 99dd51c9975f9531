//! Product catalog HTTP handlers.
//!
//! ```text
//! GET    /products?category=
//! GET    /products/{product_id}
//! POST   /products
//! PUT    /products/{product_id}
//! DELETE /products/{product_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ProductListFilter;
use crate::domain::{
    Category, Error, NewProduct, Price, Product, ProductChange, ProductChanges, ProductField,
    ProductId, ProductName, ProductValidationError, validate_description,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    missing_field_error, product_changes_error, product_validation_error,
};

/// Request payload for creating a product.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateProductRequest {
    #[schema(example = "Widget", max_length = 255)]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(example = 9.99)]
    pub price: Option<f64>,
    #[schema(example = "tools")]
    pub category: Option<String>,
}

/// Request payload for a partial update. `null` counts as absent.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateProductRequest {
    #[schema(max_length = 255)]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
}

/// Query string accepted by the listing endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListProductsQuery {
    /// Restrict the listing to one category. Blank counts as absent.
    pub category: Option<String>,
}

/// Product as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Widget")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 9.99)]
    pub price: f64,
    #[schema(example = "tools")]
    pub category: Option<String>,
    #[schema(example = "2026-01-15T12:00:00+00:00")]
    pub created_at: String,
    #[schema(example = "2026-01-15T12:00:00+00:00")]
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(value: Product) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into(),
            description: value.description,
            price: value.price.get(),
            category: value.category.map(String::from),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

fn invalid_field(error: ProductValidationError) -> Error {
    product_validation_error(&error)
}

fn parse_create_request(payload: CreateProductRequest) -> Result<NewProduct, Error> {
    let name = payload
        .name
        .ok_or_else(|| missing_field_error(ProductField::Name))?;
    let price = payload
        .price
        .ok_or_else(|| missing_field_error(ProductField::Price))?;

    Ok(NewProduct {
        name: ProductName::new(name).map_err(invalid_field)?,
        description: payload
            .description
            .map(validate_description)
            .transpose()
            .map_err(invalid_field)?,
        price: Price::new(price).map_err(invalid_field)?,
        category: payload
            .category
            .map(Category::new)
            .transpose()
            .map_err(invalid_field)?,
    })
}

fn parse_update_request(payload: UpdateProductRequest) -> Result<ProductChanges, Error> {
    let mut changes = Vec::new();
    if let Some(name) = payload.name {
        changes.push(ProductChange::Name(
            ProductName::new(name).map_err(invalid_field)?,
        ));
    }
    if let Some(description) = payload.description {
        changes.push(ProductChange::Description(
            validate_description(description).map_err(invalid_field)?,
        ));
    }
    if let Some(price) = payload.price {
        changes.push(ProductChange::Price(
            Price::new(price).map_err(invalid_field)?,
        ));
    }
    if let Some(category) = payload.category {
        changes.push(ProductChange::Category(
            Category::new(category).map_err(invalid_field)?,
        ));
    }
    ProductChanges::new(changes).map_err(|error| product_changes_error(&error))
}

fn parse_list_query(query: ListProductsQuery) -> ProductListFilter {
    match query.category.map(Category::new) {
        Some(Ok(category)) => ProductListFilter::by_category(category),
        _ => ProductListFilter::all(),
    }
}

/// List products, optionally filtered by category.
#[utoipa::path(
    get,
    path = "/products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Products ordered by id", body = [ProductResponse]),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "listProducts"
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    query: web::Query<ListProductsQuery>,
) -> ApiResult<web::Json<Vec<ProductResponse>>> {
    let filter = parse_list_query(query.into_inner());
    let products = state.products.list_products(&filter).await?;
    Ok(web::Json(
        products.into_iter().map(ProductResponse::from).collect(),
    ))
}

/// Fetch one product.
#[utoipa::path(
    get,
    path = "/products/{product_id}",
    params(("product_id" = i64, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Product", body = ProductResponse),
        (status = 404, description = "Product not found", body = ErrorSchema),
        (status = 422, description = "Malformed identifier", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "getProduct"
)]
#[get("/products/{product_id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ProductResponse>> {
    let id = ProductId::new(path.into_inner());
    let product = state.products.get_product(id).await?;
    Ok(web::Json(ProductResponse::from(product)))
}

/// Create a product.
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 422, description = "Invalid payload", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "createProduct"
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    payload: web::Json<CreateProductRequest>,
) -> ApiResult<HttpResponse> {
    let product = parse_create_request(payload.into_inner())?;
    let created = state.product_commands.create_product(product).await?;
    Ok(HttpResponse::Created().json(ProductResponse::from(created)))
}

/// Apply a partial update to a product.
#[utoipa::path(
    put,
    path = "/products/{product_id}",
    params(("product_id" = i64, Path, description = "Product identifier")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductResponse),
        (status = 400, description = "No fields to update", body = ErrorSchema),
        (status = 404, description = "Product not found", body = ErrorSchema),
        (status = 422, description = "Invalid field", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "updateProduct"
)]
#[put("/products/{product_id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateProductRequest>,
) -> ApiResult<web::Json<ProductResponse>> {
    let id = ProductId::new(path.into_inner());
    let changes = parse_update_request(payload.into_inner())?;
    let updated = state.product_commands.update_product(id, changes).await?;
    Ok(web::Json(ProductResponse::from(updated)))
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/products/{product_id}",
    params(("product_id" = i64, Path, description = "Product identifier")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "deleteProduct"
)]
#[delete("/products/{product_id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = ProductId::new(path.into_inner());
    state.product_commands.delete_product(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
