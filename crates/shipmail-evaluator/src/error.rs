//! Evaluator error types

use thiserror::Error;

/// Errors raised while loading record sets
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluatorError {
    /// The document was not a JSON array of records
    #[error("Expected a JSON array of records, found {0}")]
    NotAnArray(String),

    /// An array element was not an object
    #[error("Record {index} is not a JSON object")]
    NotAnObject {
        /// Position in the array
        index: usize,
    },

    /// A record had no string `id`
    #[error("Record {index} has no string 'id'")]
    MissingId {
        /// Position in the array
        index: usize,
    },

    /// A typed record could not be turned into JSON
    #[error("Serialization error: {0}")]
    Serialization(String),
}
