//! Error types for the Extractor

use shipmail_gatekeeper::GatekeeperError;
use thiserror::Error;

/// Errors that can occur while turning a model reply into a record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    /// The reply did not contain a recoverable JSON object
    #[error("Parse error: {0}")]
    Parse(String),

    /// The parsed object violated the record's rules
    #[error("Validation error: {0}")]
    Validation(#[from] GatekeeperError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
