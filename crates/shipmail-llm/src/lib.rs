//! Shipmail LLM Provider Layer
//!
//! Implementations of the `CompletionProvider` trait from `shipmail-domain`,
//! plus the bounded retry machinery the extractor drives them with.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted replies for testing
//! - `ChatCompletionsProvider`: OpenAI-compatible chat completions (Groq by default)
//!
//! # Retry
//!
//! A provider makes exactly one attempt per call. `RetryingClient` wraps a
//! provider, classifies every outcome into an [`Attempt`] and lets
//! [`Backoff`] decide how long to wait before the next one.
//!
//! # Examples
//!
//! ```
//! use shipmail_llm::{MockProvider, RetryPolicy, RetryingClient};
//! use shipmail_domain::CompletionRequest;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new(r#"{"incoterm": "FOB"}"#);
//! let client = RetryingClient::new(provider, RetryPolicy::default());
//!
//! let request = CompletionRequest {
//!     model: "llama-3.1-70b-versatile".to_string(),
//!     system: "Return JSON.".to_string(),
//!     prompt: "Email body".to_string(),
//!     temperature: 0.0,
//!     max_tokens: 1000,
//! };
//! let text = client.complete(&request).await;
//! assert_eq!(text.as_deref(), Some(r#"{"incoterm": "FOB"}"#));
//! # }
//! ```

#![warn(missing_docs)]

pub mod groq;
pub mod retry;

use shipmail_domain::{CompletionProvider, CompletionRequest};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

pub use groq::ChatCompletionsProvider;
pub use retry::{Attempt, Backoff, RetryPolicy, RetryingClient};

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Credentials rejected
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether the error signals a rate-limit condition
    ///
    /// Besides the dedicated variant, any error whose message mentions
    /// `rate_limit` or `429` counts; some gateways only say so in the body.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            LlmError::RateLimitExceeded(_) => true,
            other => {
                let message = other.to_string().to_lowercase();
                message.contains("rate_limit") || message.contains("429")
            }
        }
    }
}

/// One scripted reply of the [`MockProvider`]
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Successful completion text
    Text(String),

    /// A rate-limit error
    RateLimited,

    /// A non rate-limit failure
    Fail(String),
}

/// Mock provider for deterministic testing
///
/// Replies are scripted per model and consumed in order; once a model's
/// script is empty the default reply is returned. No network calls are made.
///
/// # Examples
///
/// ```
/// use shipmail_llm::{MockProvider, MockReply};
///
/// let mut provider = MockProvider::new("{}");
/// provider.push_reply("primary", MockReply::RateLimited);
/// provider.push_reply("primary", MockReply::Text("{\"a\": 1}".into()));
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    scripts: Arc<Mutex<HashMap<String, VecDeque<MockReply>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a MockProvider answering every prompt with the same text
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_default(MockReply::Text(response.into()))
    }

    /// Create a MockProvider whose every call fails with a transient error
    pub fn failing() -> Self {
        Self::with_default(MockReply::Fail("connection refused".to_string()))
    }

    /// Create a MockProvider with an arbitrary default reply
    pub fn with_default(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            scripts: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a reply for the given model
    pub fn push_reply(&mut self, model: impl Into<String>, reply: MockReply) {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(model.into())
            .or_default()
            .push_back(reply);
    }

    /// Queue the same reply `times` times for the given model
    pub fn push_replies(&mut self, model: impl Into<String>, reply: MockReply, times: usize) {
        let model = model.into();
        for _ in 0..times {
            self.push_reply(model.clone(), reply.clone());
        }
    }

    /// Total number of completion calls made
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of completion calls made against one model
    pub fn calls_for(&self, model: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|m| m.as_str() == model)
            .count()
    }

    /// Models called, in call order
    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn next_reply(&self, model: &str) -> MockReply {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(model)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| self.default_reply.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.model.clone());

        match self.next_reply(&request.model) {
            MockReply::Text(text) => Ok(text),
            MockReply::RateLimited => Err(LlmError::RateLimitExceeded(format!(
                "rate_limit_exceeded for model {}",
                request.model
            ))),
            MockReply::Fail(message) => Err(LlmError::Communication(message)),
        }
    }
}
