//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The API key environment variable is unset or empty
    #[error("{0} environment variable not set. Export it or add it to a .env file.")]
    MissingApiKey(String),

    /// A required input file is absent
    #[error("{0} not found")]
    FileNotFound(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(#[from] shipmail_llm::LlmError),

    /// Extractor error
    #[error("Extractor error: {0}")]
    Extractor(#[from] shipmail_extractor::ExtractorError),

    /// Evaluator error
    #[error("Evaluator error: {0}")]
    Evaluator(#[from] shipmail_evaluator::EvaluatorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Setup check reported failures
    #[error("{0} setup check(s) failed")]
    CheckFailed(usize),
}
