//! Configuration for the Extractor

use crate::prompt::DEFAULT_SYSTEM_PROMPT;
use serde::{Deserialize, Serialize};
use shipmail_llm::RetryPolicy;
use std::fmt;
use std::time::Duration;

/// Primary model used for extraction
pub const DEFAULT_PRIMARY_MODEL: &str = "llama-3.1-70b-versatile";

/// Model tried once the primary is exhausted
pub const DEFAULT_FALLBACK_MODEL: &str = "llama-3.3-70b-versatile";

/// A model the extractor may call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Provider-side model identifier
    pub name: String,
}

impl ModelDescriptor {
    /// Describe a model by name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Prompt template revision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptVersion {
    /// Field list and example only
    V1,
    /// Business rules and a port reference
    V2,
    /// Comprehensive rules for ports, incoterms, dangerous goods and units
    #[default]
    V3,
}

impl fmt::Display for PromptVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PromptVersion::V1 => "v1",
            PromptVersion::V2 => "v2",
            PromptVersion::V3 => "v3",
        };
        f.write_str(name)
    }
}

/// Configuration for the Extractor
///
/// Immutable once handed to [`crate::Extractor::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Upper bound on generated tokens per call
    pub max_tokens: u32,

    /// Pause between consecutive emails of a batch (milliseconds)
    pub inter_email_delay_ms: u64,

    /// Maximum port codes listed in the prompt
    pub port_reference_limit: usize,

    /// Prompt template revision
    pub prompt_version: PromptVersion,

    /// System message sent with every call
    pub system_prompt: String,

    /// Models in the order they are tried; the first is the primary
    pub models: Vec<ModelDescriptor>,

    /// Retry protocol applied to each model
    pub retry: RetryPolicy,
}

impl ExtractorConfig {
    /// Get the inter-email delay as a Duration
    pub fn inter_email_delay(&self) -> Duration {
        Duration::from_millis(self.inter_email_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.models.is_empty() {
            return Err("at least one model must be configured".to_string());
        }
        if self.models.iter().any(|m| m.name.trim().is_empty()) {
            return Err("model names must not be empty".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        self.retry.validate()
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            inter_email_delay_ms: 500,
            port_reference_limit: 30,
            prompt_version: PromptVersion::V3,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            models: vec![
                ModelDescriptor::new(DEFAULT_PRIMARY_MODEL),
                ModelDescriptor::new(DEFAULT_FALLBACK_MODEL),
            ],
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.models[0].name, DEFAULT_PRIMARY_MODEL);
        assert_eq!(config.models[1].name, DEFAULT_FALLBACK_MODEL);
        assert_eq!(config.inter_email_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_empty_model_list_rejected() {
        let config = ExtractorConfig {
            models: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let config = ExtractorConfig {
            max_tokens: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_retry_rejected() {
        let mut config = ExtractorConfig::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml(
            r#"
            prompt_version = "v1"

            [[models]]
            name = "mixtral-8x7b"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.prompt_version, PromptVersion::V1);
        assert_eq!(parsed.models, vec![ModelDescriptor::new("mixtral-8x7b")]);
        assert_eq!(parsed.max_tokens, 1000);
        assert_eq!(parsed.retry, RetryPolicy::default());
    }

    #[test]
    fn test_unknown_prompt_version_rejected() {
        assert!(ExtractorConfig::from_toml(r#"prompt_version = "v9""#).is_err());
    }
}
