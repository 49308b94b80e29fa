//! OpenAI-compatible chat completions provider
//!
//! Talks to any `/chat/completions` endpoint that follows the OpenAI wire
//! format. The default endpoint is Groq's.
//!
//! # Examples
//!
//! ```no_run
//! use shipmail_llm::ChatCompletionsProvider;
//!
//! let provider = ChatCompletionsProvider::groq("gsk_...").unwrap();
//! // Calls go through `CompletionProvider::complete`, usually wrapped in a
//! // `RetryingClient`.
//! ```

use crate::LlmError;
use serde::{Deserialize, Serialize};
use shipmail_domain::{CompletionProvider, CompletionRequest};
use std::time::Duration;
use tracing::debug;

/// Default Groq OpenAI-compatible endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1";

/// Default timeout for completion requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Chat completions provider; one HTTP request per call
pub struct ChatCompletionsProvider {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsProvider {
    /// Create a provider for an arbitrary endpoint
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Other`] if the HTTP client cannot be constructed.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create a provider for Groq with default settings
    pub fn groq(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(
            DEFAULT_ENDPOINT,
            api_key,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// The configured endpoint, without trailing slash
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_body<'a>(request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    fn parse_response(body: &str) -> Result<String, LlmError> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response contained no message content".to_string()))
    }

    /// Map an HTTP error status to the matching [`LlmError`]
    fn map_http_error(status: reqwest::StatusCode, model: &str, body: &str) -> LlmError {
        match status.as_u16() {
            401 | 403 => LlmError::Auth(format!("HTTP {}", status)),
            404 => LlmError::ModelNotAvailable(model.to_string()),
            429 => LlmError::RateLimitExceeded(body.to_string()),
            _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
        }
    }
}

impl CompletionProvider for ChatCompletionsProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        let url = format!("{}/chat/completions", self.endpoint);
        debug!(model = %request.model, prompt_chars = request.prompt.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&Self::build_body(request))
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read body: {}", e)))?;

        if !status.is_success() {
            return Err(Self::map_http_error(status, &request.model, &body));
        }

        Self::parse_response(&body)
    }
}
