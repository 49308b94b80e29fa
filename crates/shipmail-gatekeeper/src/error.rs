//! Gatekeeper error types

use thiserror::Error;

/// Reasons a raw extraction cannot become a typed record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatekeeperError {
    /// The model output was valid JSON but not an object
    #[error("Expected a JSON object, found {0}")]
    NotAnObject(String),

    /// A field had the wrong JSON type
    #[error("Field '{field}' expected {expected}, found {found}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// Expected type
        expected: &'static str,
        /// JSON value actually found
        found: String,
    },

    /// A field had the right type but a value outside its vocabulary
    #[error("Field '{field}' has unsupported value '{value}'")]
    InvalidValue {
        /// Field name
        field: String,
        /// Offending value
        value: String,
    },

    /// Weight or volume below zero
    #[error("Field '{field}' must not be negative, found {value}")]
    NegativeQuantity {
        /// Field name
        field: String,
        /// Offending value
        value: f64,
    },
}
