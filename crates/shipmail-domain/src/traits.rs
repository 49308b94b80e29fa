//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::future::Future;

/// A single completion call against a named model
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier understood by the provider
    pub model: String,

    /// System message framing the task
    pub system: String,

    /// User prompt with the email interpolated
    pub prompt: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

/// Trait for text-completion services
///
/// Implemented by the infrastructure layer (shipmail-llm). A provider makes
/// exactly one attempt per call; retry policy lives above it.
pub trait CompletionProvider {
    /// Error type for completion calls
    type Error;

    /// Send one request and return the model's raw text
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, Self::Error>>;
}
