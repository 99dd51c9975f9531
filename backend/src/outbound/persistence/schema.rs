//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Catalog products.
    ///
    /// `id` is a store-assigned identity; `price` carries a `> 0` check
    /// constraint and `category` is indexed for filtered listings.
    products (id) {
        id -> Int8,
        name -> Varchar,
        description -> Nullable<Text>,
        price -> Float8,
        category -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
