//! Shared validation helpers for inbound HTTP adapters.
//!
//! Field failures become `422 unprocessable_entity` with the offending field
//! and a stable code in `details`; an update naming no fields is the only
//! `400 invalid_request`.

use serde_json::json;

use crate::domain::{Error, ProductChangesError, ProductField, ProductValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    EmptyName,
    NameTooLong,
    NonPositivePrice,
    NonFinitePrice,
    BlankCategory,
    CategoryTooLong,
    ContainsNul,
    DuplicateField,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::EmptyName => "empty_name",
            ErrorCode::NameTooLong => "name_too_long",
            ErrorCode::NonPositivePrice => "non_positive_price",
            ErrorCode::NonFinitePrice => "non_finite_price",
            ErrorCode::BlankCategory => "blank_category",
            ErrorCode::CategoryTooLong => "category_too_long",
            ErrorCode::ContainsNul => "contains_nul",
            ErrorCode::DuplicateField => "duplicate_field",
        }
    }
}

impl From<&ProductValidationError> for ErrorCode {
    fn from(error: &ProductValidationError) -> Self {
        match error {
            ProductValidationError::EmptyName => Self::EmptyName,
            ProductValidationError::NameTooLong { .. } => Self::NameTooLong,
            ProductValidationError::NonPositivePrice => Self::NonPositivePrice,
            ProductValidationError::NonFinitePrice => Self::NonFinitePrice,
            ProductValidationError::BlankCategory => Self::BlankCategory,
            ProductValidationError::CategoryTooLong { .. } => Self::CategoryTooLong,
            ProductValidationError::ContainsNul { .. } => Self::ContainsNul,
        }
    }
}

fn field_error(field: ProductField, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::unprocessable_entity(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: ProductField) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {field}"),
    )
}

pub(crate) fn product_validation_error(error: &ProductValidationError) -> Error {
    field_error(error.field(), ErrorCode::from(error), error.to_string())
}

pub(crate) fn product_changes_error(error: &ProductChangesError) -> Error {
    match error {
        ProductChangesError::Empty => Error::invalid_request(error.to_string()),
        ProductChangesError::Duplicate { field } => {
            field_error(*field, ErrorCode::DuplicateField, error.to_string())
        }
    }
}
