//! Core Extractor implementation

use crate::config::{ExtractorConfig, ModelDescriptor};
use crate::error::ExtractorError;
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use crate::types::{BatchSummary, ExtractionOutcome, ExtractionStatus};
use shipmail_domain::{CompletionProvider, CompletionRequest, EmailInput, PortIndex, ShipmentExtraction};
use shipmail_gatekeeper::Gatekeeper;
use shipmail_llm::{Attempt, LlmError, RetryingClient};
use tracing::{debug, info, warn};

/// Sampling temperature for every call; extraction must be reproducible
const TEMPERATURE: f32 = 0.0;

/// The Extractor turns emails into shipment records
///
/// Each email is sent to the configured models in order, each with its own
/// retry budget. Only a model that never answers hands over to the next one.
/// The first reply is parsed and repaired; if either step fails the email
/// gets a placeholder record without consulting further models.
pub struct Extractor<P> {
    client: RetryingClient<P>,
    gatekeeper: Gatekeeper,
    ports: PortIndex,
    port_reference: String,
    config: ExtractorConfig,
}

impl<P> Extractor<P>
where
    P: CompletionProvider<Error = LlmError>,
{
    /// Create a new Extractor
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::Config`] if the configuration is invalid.
    pub fn new(
        provider: P,
        ports: PortIndex,
        gatekeeper: Gatekeeper,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        let port_reference = ports.reference_listing(config.port_reference_limit);
        let client = RetryingClient::new(provider, config.retry.clone());

        Ok(Self {
            client,
            gatekeeper,
            ports,
            port_reference,
            config,
        })
    }

    /// The configuration in force
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Access the wrapped provider
    pub fn provider(&self) -> &P {
        self.client.provider()
    }

    /// Extract the shipment record for a single email
    ///
    /// Never fails: irrecoverable emails yield a placeholder outcome.
    pub async fn extract_one(&self, email: &EmailInput) -> ExtractionOutcome {
        let prompt = PromptBuilder::new(self.config.prompt_version, &self.port_reference).build(email);
        debug!(email_id = %email.id, prompt_chars = prompt.len(), "Prompt built");

        let mut last_error = String::from("no model configured");

        for (position, model) in self.config.models.iter().enumerate() {
            if position > 0 {
                warn!(email_id = %email.id, model = %model, "Trying fallback model");
            }

            match self.call_model(model, &prompt).await {
                Ok(text) => {
                    debug!(email_id = %email.id, model = %model, response_chars = text.len(), "Response received");
                    return self.finish(email, model, &text);
                }
                Err(cause) => {
                    warn!(email_id = %email.id, model = %model, cause = %cause, "Model exhausted");
                    last_error = cause;
                }
            }
        }

        warn!(email_id = %email.id, "No model answered, emitting placeholder");
        ExtractionOutcome::failure(&email.id, ExtractionStatus::FailedNoResponse, last_error)
    }

    /// Extract records for a batch, strictly one email at a time
    ///
    /// Returns exactly one outcome per email, in input order. The configured
    /// inter-email delay is slept between consecutive emails, not after the
    /// last one.
    pub async fn extract_batch(&self, emails: &[EmailInput]) -> Vec<ExtractionOutcome> {
        let total = emails.len();
        info!("Starting batch extraction: {} emails", total);

        let mut outcomes = Vec::with_capacity(total);
        for (i, email) in emails.iter().enumerate() {
            info!("[{}/{}] Processing {}", i + 1, total, email.id);
            outcomes.push(self.extract_one(email).await);

            if i + 1 < total {
                tokio::time::sleep(self.config.inter_email_delay()).await;
            }
        }

        let summary = BatchSummary::from_outcomes(&outcomes);
        info!(
            "Batch extraction complete: {} processed, {} succeeded, {} failed",
            summary.total,
            summary.succeeded,
            summary.failed()
        );

        outcomes
    }

    /// Extract a batch and keep only the records
    pub async fn extract_records(&self, emails: &[EmailInput]) -> Vec<ShipmentExtraction> {
        self.extract_batch(emails)
            .await
            .into_iter()
            .map(|outcome| outcome.record)
            .collect()
    }

    /// Call one model with retries; `Err` carries the last failure message
    async fn call_model(&self, model: &ModelDescriptor, prompt: &str) -> Result<String, String> {
        let request = CompletionRequest {
            model: model.name.clone(),
            system: self.config.system_prompt.clone(),
            prompt: prompt.to_string(),
            temperature: TEMPERATURE,
            max_tokens: self.config.max_tokens,
        };

        match self.client.run(&request).await {
            Attempt::Ok(text) => Ok(text),
            exhausted => Err(exhausted.error_message().unwrap_or("no response").to_string()),
        }
    }

    /// Parse and repair a reply; failures end the email with a placeholder
    fn finish(&self, email: &EmailInput, model: &ModelDescriptor, text: &str) -> ExtractionOutcome {
        let raw = match parse_response(text) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(email_id = %email.id, model = %model, error = %e, "Unparseable response, emitting placeholder");
                return ExtractionOutcome::failure(&email.id, ExtractionStatus::FailedUnparseable, e.to_string());
            }
        };

        match self.gatekeeper.repair_value(&raw, &email.id, &self.ports) {
            Ok(record) => {
                info!(email_id = %email.id, model = %model, "Extraction succeeded");
                ExtractionOutcome::success(record, model.name.clone())
            }
            Err(e) => {
                let e = ExtractorError::from(e);
                warn!(email_id = %email.id, model = %model, error = %e, "Invalid extraction, emitting placeholder");
                ExtractionOutcome::failure(&email.id, ExtractionStatus::FailedInvalid, e.to_string())
            }
        }
    }
}
