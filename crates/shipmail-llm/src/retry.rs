//! Bounded retry with exponential backoff for rate limits
//!
//! Every provider outcome is classified into an [`Attempt`]. [`Backoff`] is a
//! pure state machine over those outcomes; [`RetryingClient`] is the loop that
//! sleeps for whatever it decides.
//!
//! Rate-limited attempts wait an initial delay that doubles per rate-limited
//! attempt up to a cap. Any other failure waits a short fixed delay. After the
//! last attempt nothing is slept and the call reports exhaustion.

use crate::LlmError;
use serde::{Deserialize, Serialize};
use shipmail_domain::{CompletionProvider, CompletionRequest};
use std::time::Duration;
use tracing::{debug, warn};

/// Default number of attempts per model
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default first delay after a rate-limited attempt (milliseconds)
pub const DEFAULT_INITIAL_RATE_LIMIT_DELAY_MS: u64 = 2_000;

/// Default cap for the rate-limit delay (milliseconds)
pub const DEFAULT_MAX_RATE_LIMIT_DELAY_MS: u64 = 30_000;

/// Default delay after any other failure (milliseconds)
pub const DEFAULT_TRANSIENT_DELAY_MS: u64 = 1_000;

/// Retry constants for one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Attempts per model, including the first one
    pub max_attempts: u32,

    /// First delay after a rate-limited attempt
    pub initial_rate_limit_delay_ms: u64,

    /// Upper bound for the doubling rate-limit delay
    pub max_rate_limit_delay_ms: u64,

    /// Delay after a non rate-limit failure
    pub transient_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_rate_limit_delay_ms: DEFAULT_INITIAL_RATE_LIMIT_DELAY_MS,
            max_rate_limit_delay_ms: DEFAULT_MAX_RATE_LIMIT_DELAY_MS,
            transient_delay_ms: DEFAULT_TRANSIENT_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    /// Validate the policy
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        if self.initial_rate_limit_delay_ms > self.max_rate_limit_delay_ms {
            return Err(format!(
                "initial_rate_limit_delay_ms {} exceeds max_rate_limit_delay_ms {}",
                self.initial_rate_limit_delay_ms, self.max_rate_limit_delay_ms
            ));
        }
        Ok(())
    }
}

/// Outcome of a completion attempt, or of a whole retry run
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt {
    /// The model answered
    Ok(String),

    /// The service refused because of its request-rate policy
    RateLimited(String),

    /// Any other failure (network, server, auth, malformed body)
    Transient(String),

    /// Every attempt for the model failed
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Message of the last failure
        last_error: String,
    },
}

impl From<Result<String, LlmError>> for Attempt {
    fn from(result: Result<String, LlmError>) -> Self {
        match result {
            Ok(text) => Attempt::Ok(text),
            Err(e) if e.is_rate_limit() => Attempt::RateLimited(e.to_string()),
            Err(e) => Attempt::Transient(e.to_string()),
        }
    }
}

impl Attempt {
    /// Message of a failed attempt
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Attempt::Ok(_) => None,
            Attempt::RateLimited(msg) | Attempt::Transient(msg) => Some(msg),
            Attempt::Exhausted { last_error, .. } => Some(last_error),
        }
    }
}

/// Backoff state for one model call sequence
///
/// Fresh for every email and model; nothing carries over between them.
///
/// # Examples
///
/// ```
/// use shipmail_llm::{Attempt, Backoff, RetryPolicy};
/// use std::time::Duration;
///
/// let mut backoff = Backoff::new(&RetryPolicy::default());
/// let limited = Attempt::RateLimited("429".into());
///
/// assert_eq!(backoff.next_delay(&limited), Some(Duration::from_secs(2)));
/// assert_eq!(backoff.next_delay(&limited), Some(Duration::from_secs(4)));
/// assert_eq!(backoff.next_delay(&limited), None); // third attempt was the last
/// ```
#[derive(Debug, Clone)]
pub struct Backoff {
    max_attempts: u32,
    failed_attempts: u32,
    rate_limit_delay: Duration,
    max_rate_limit_delay: Duration,
    transient_delay: Duration,
}

impl Backoff {
    /// Start a new sequence under the given policy
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts,
            failed_attempts: 0,
            rate_limit_delay: Duration::from_millis(policy.initial_rate_limit_delay_ms),
            max_rate_limit_delay: Duration::from_millis(policy.max_rate_limit_delay_ms),
            transient_delay: Duration::from_millis(policy.transient_delay_ms),
        }
    }

    /// Record a failed attempt and return the pause before the next one
    ///
    /// Returns `None` when no further attempt should be made: the attempt
    /// budget is spent, or the outcome was not a retryable failure.
    pub fn next_delay(&mut self, outcome: &Attempt) -> Option<Duration> {
        let retryable = matches!(outcome, Attempt::RateLimited(_) | Attempt::Transient(_));
        if !retryable {
            return None;
        }

        self.failed_attempts += 1;
        if self.failed_attempts >= self.max_attempts {
            return None;
        }

        match outcome {
            Attempt::RateLimited(_) => {
                let delay = self.rate_limit_delay;
                self.rate_limit_delay = (self.rate_limit_delay * 2).min(self.max_rate_limit_delay);
                Some(delay)
            }
            _ => Some(self.transient_delay),
        }
    }

    /// Failed attempts recorded so far
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }
}

/// Wraps a provider with the bounded retry protocol
pub struct RetryingClient<P> {
    provider: P,
    policy: RetryPolicy,
}

impl<P> RetryingClient<P>
where
    P: CompletionProvider<Error = LlmError>,
{
    /// Create a new retrying client
    pub fn new(provider: P, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Access the wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The retry policy in force
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run the retry protocol and report the final outcome
    ///
    /// The result is either [`Attempt::Ok`] or [`Attempt::Exhausted`].
    pub async fn run(&self, request: &CompletionRequest) -> Attempt {
        let mut backoff = Backoff::new(&self.policy);

        loop {
            let outcome = Attempt::from(self.provider.complete(request).await);
            if let Attempt::Ok(text) = outcome {
                debug!(model = %request.model, chars = text.len(), "Completion received");
                return Attempt::Ok(text);
            }

            let attempt_no = backoff.failed_attempts() + 1;
            let message = outcome.error_message().unwrap_or_default().to_string();
            warn!(
                model = %request.model,
                attempt = attempt_no,
                max = self.policy.max_attempts,
                error = %truncate(&message, 100),
                "Completion attempt failed"
            );

            match backoff.next_delay(&outcome) {
                Some(delay) => {
                    if matches!(outcome, Attempt::RateLimited(_)) {
                        warn!(model = %request.model, delay_ms = delay.as_millis() as u64, "Rate limited, backing off");
                    }
                    tokio::time::sleep(delay).await;
                }
                None => {
                    return Attempt::Exhausted {
                        attempts: backoff.failed_attempts(),
                        last_error: message,
                    };
                }
            }
        }
    }

    /// Complete a prompt, returning `None` once every attempt has failed
    pub async fn complete(&self, request: &CompletionRequest) -> Option<String> {
        match self.run(request).await {
            Attempt::Ok(text) => Some(text),
            _ => None,
        }
    }
}

fn truncate(message: &str, max_chars: usize) -> &str {
    match message.char_indices().nth(max_chars) {
        Some((idx, _)) => &message[..idx],
        None => message,
    }
}
