//! Errors raised when constructing bounded values.

use thiserror::Error;

/// A numeric input fell outside its declared inclusive bounds.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{field} must be within [{min}, {max}], got {value}")]
pub struct RangeError {
    pub field: &'static str,
    pub value: u64,
    pub min: u64,
    pub max: u64,
}
