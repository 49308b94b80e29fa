//! Shipmail Extractor
//!
//! Turns freight-forwarding emails into [`ShipmentExtraction`] records with
//! an LLM.
//!
//! # Architecture
//!
//! ```text
//! Email → Prompt → RetryingClient → Parser → Gatekeeper → ShipmentExtraction
//!                   (primary, then fallback models)
//! ```
//!
//! # Key Features
//!
//! - **Versioned prompts**: three template revisions interpolating the email
//!   and a port reference listing
//! - **Model fallback**: an ordered model list walked per email, each with its
//!   own bounded retry protocol
//! - **Lenient parsing**: JSON is recovered from fenced blocks or prose
//! - **Total output**: exactly one record per email, in input order; failures
//!   become placeholder records
//!
//! # Example Usage
//!
//! ```no_run
//! use shipmail_domain::{EmailInput, PortIndex, PortReference};
//! use shipmail_extractor::{Extractor, ExtractorConfig};
//! use shipmail_gatekeeper::Gatekeeper;
//! use shipmail_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new(r#"{"origin_port_code": "HKHKG"}"#);
//! let ports = PortIndex::build(&[PortReference::new("HKHKG", "Hong Kong")]);
//! let extractor = Extractor::new(
//!     provider,
//!     ports,
//!     Gatekeeper::default_config(),
//!     ExtractorConfig::default(),
//! )?;
//!
//! let emails = vec![EmailInput::new("EMAIL_001", "RFQ", "2 cbm ex Hong Kong")];
//! let outcomes = extractor.extract_batch(&emails).await;
//!
//! println!("{}: {}", outcomes[0].record.id, outcomes[0].status);
//! # Ok(())
//! # }
//! ```
//!
//! [`ShipmentExtraction`]: shipmail_domain::ShipmentExtraction

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod types;


pub use config::{
    ExtractorConfig, ModelDescriptor, PromptVersion, DEFAULT_FALLBACK_MODEL, DEFAULT_PRIMARY_MODEL,
};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use parser::parse_response;
pub use prompt::{template, PromptBuilder, DEFAULT_SYSTEM_PROMPT};
pub use types::{BatchSummary, ExtractionOutcome, ExtractionStatus};
