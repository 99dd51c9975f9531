//! Product catalog entity and its validated building blocks.
//!
//! Every field type validates on construction and on deserialisation, so a
//! `Product` read back from the cache carries the same guarantees as one read
//! from the store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of characters in a product name.
pub const PRODUCT_NAME_MAX: usize = 255;

/// Maximum number of characters in a category label.
pub const CATEGORY_MAX: usize = 255;

/// Validation failures raised by the product field constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductValidationError {
    /// Name was empty.
    #[error("name must not be empty")]
    EmptyName,
    /// Name exceeded [`PRODUCT_NAME_MAX`] characters.
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    /// Price was zero or negative.
    #[error("price must be greater than zero")]
    NonPositivePrice,
    /// Price was NaN or infinite.
    #[error("price must be a finite number")]
    NonFinitePrice,
    /// Category was blank.
    #[error("category must not be blank")]
    BlankCategory,
    /// Category exceeded [`CATEGORY_MAX`] characters.
    #[error("category must be at most {max} characters")]
    CategoryTooLong { max: usize },
    /// Text field contained a NUL character, which the store cannot hold.
    #[error("{field} must not contain NUL characters")]
    ContainsNul { field: ProductField },
}

impl ProductValidationError {
    /// Request field the failure refers to.
    #[must_use]
    pub fn field(&self) -> ProductField {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => ProductField::Name,
            Self::NonPositivePrice | Self::NonFinitePrice => ProductField::Price,
            Self::BlankCategory | Self::CategoryTooLong { .. } => ProductField::Category,
            Self::ContainsNul { field } => *field,
        }
    }
}

/// Store-assigned product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Wrap a raw store identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier as stored.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn reject_nul(value: &str, field: ProductField) -> Result<(), ProductValidationError> {
    if value.contains('\0') {
        Err(ProductValidationError::ContainsNul { field })
    } else {
        Ok(())
    }
}

/// Check a free-text description. Any length is accepted; NUL is not.
///
/// # Errors
///
/// Returns [`ProductValidationError::ContainsNul`] when `value` holds a NUL
/// character.
pub fn validate_description(value: String) -> Result<String, ProductValidationError> {
    reject_nul(&value, ProductField::Description)?;
    Ok(value)
}

/// Product name: 1 to [`PRODUCT_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductName(String);

impl ProductName {
    /// Validate and wrap a product name.
    pub fn new(value: impl Into<String>) -> Result<Self, ProductValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ProductValidationError::EmptyName);
        }
        reject_nul(&value, ProductField::Name)?;
        if value.chars().count() > PRODUCT_NAME_MAX {
            return Err(ProductValidationError::NameTooLong {
                max: PRODUCT_NAME_MAX,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ProductName {
    type Error = ProductValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductName> for String {
    fn from(value: ProductName) -> Self {
        value.0
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strictly positive, finite unit price.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    /// Validate and wrap a price.
    pub fn new(value: f64) -> Result<Self, ProductValidationError> {
        if !value.is_finite() {
            return Err(ProductValidationError::NonFinitePrice);
        }
        if value <= 0.0 {
            return Err(ProductValidationError::NonPositivePrice);
        }
        Ok(Self(value))
    }

    /// Price as a floating point value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Price {
    type Error = ProductValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

/// Category label; used both as a list filter and as a cache partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Validate and wrap a category of 1 to [`CATEGORY_MAX`] characters.
    /// Blank input is rejected.
    pub fn new(value: impl Into<String>) -> Result<Self, ProductValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ProductValidationError::BlankCategory);
        }
        reject_nul(&value, ProductField::Category)?;
        if value.chars().count() > CATEGORY_MAX {
            return Err(ProductValidationError::CategoryTooLong { max: CATEGORY_MAX });
        }
        Ok(Self(value))
    }

    /// Borrow the category label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Category {
    type Error = ProductValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog product as held by the store.
///
/// The serialised form is also the cache payload format, and downstream
/// consumers of the cached lists rely on its snake_case field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub description: Option<String>,
    pub price: Price,
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Return a copy with `changes` applied and `updated_at` refreshed.
    ///
    /// Fields not named in `changes` are carried over untouched.
    #[must_use]
    pub fn with_changes(&self, changes: &ProductChanges, updated_at: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        for change in changes.iter() {
            match change {
                ProductChange::Name(name) => next.name = name.clone(),
                ProductChange::Description(description) => {
                    next.description = Some(description.clone());
                }
                ProductChange::Price(price) => next.price = *price,
                ProductChange::Category(category) => next.category = Some(category.clone()),
            }
        }
        next.updated_at = updated_at;
        next
    }
}

/// Validated payload for creating a product; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub description: Option<String>,
    pub price: Price,
    pub category: Option<Category>,
}

/// Mutable product fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Name,
    Description,
    Price,
    Category,
}

impl ProductField {
    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Price => "price",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One assignment within a partial update.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductChange {
    Name(ProductName),
    Description(String),
    Price(Price),
    Category(Category),
}

impl ProductChange {
    /// Field this change assigns.
    #[must_use]
    pub const fn field(&self) -> ProductField {
        match self {
            Self::Name(_) => ProductField::Name,
            Self::Description(_) => ProductField::Description,
            Self::Price(_) => ProductField::Price,
            Self::Category(_) => ProductField::Category,
        }
    }
}

/// Errors raised when assembling a [`ProductChanges`] set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductChangesError {
    /// No field was supplied.
    #[error("No fields to update")]
    Empty,
    /// The same field was assigned twice.
    #[error("field {field} assigned more than once")]
    Duplicate { field: ProductField },
}

/// Non-empty set of field assignments for a partial update.
///
/// Each field appears at most once. An empty update cannot be represented, so
/// callers holding a `ProductChanges` always have something to write.
///
/// # Examples
/// ```
/// use product_service::domain::{Category, ProductChange, ProductChanges, ProductChangesError};
///
/// let changes = ProductChanges::new(vec![ProductChange::Category(
///     Category::new("B").expect("valid category"),
/// )])
/// .expect("one change");
/// assert_eq!(changes.category().map(|c| c.as_str()), Some("B"));
///
/// assert_eq!(ProductChanges::new(Vec::new()), Err(ProductChangesError::Empty));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProductChanges(Vec<ProductChange>);

impl ProductChanges {
    /// Validate that `changes` is non-empty and free of duplicate fields.
    pub fn new(changes: Vec<ProductChange>) -> Result<Self, ProductChangesError> {
        if changes.is_empty() {
            return Err(ProductChangesError::Empty);
        }
        for (index, change) in changes.iter().enumerate() {
            let field = change.field();
            if changes
                .iter()
                .skip(index + 1)
                .any(|other| other.field() == field)
            {
                return Err(ProductChangesError::Duplicate { field });
            }
        }
        Ok(Self(changes))
    }

    /// Iterate the assignments in the order supplied.
    pub fn iter(&self) -> impl Iterator<Item = &ProductChange> {
        self.0.iter()
    }

    /// Number of assigned fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// New category, when the update assigns one.
    #[must_use]
    pub fn category(&self) -> Option<&Category> {
        self.0.iter().find_map(|change| match change {
            ProductChange::Category(category) => Some(category),
            _ => None,
        })
    }
}
