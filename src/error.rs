//! Dataset validation errors

use thiserror::Error;

/// A row in the stored dataset violates a field constraint.
///
/// Raised when loading rows out of the database, before any resolution
/// happens. Bad quantities are never coerced or silently dropped.
#[derive(Debug, Error)]
pub enum DataError {
    #[error(
        "recipe '{recipe}' material '{material}': quantity must be a positive integer, got {quantity}"
    )]
    InvalidQuantity {
        recipe: String,
        material: String,
        quantity: i64,
    },
}
