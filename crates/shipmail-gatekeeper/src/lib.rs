//! Shipmail Gatekeeper
//!
//! Turns the raw JSON object a model produced into a well-typed
//! [`ShipmentExtraction`](shipmail_domain::ShipmentExtraction), enforcing the
//! business invariants on the way:
//!
//! - known port codes get their canonical name, whatever the model wrote
//! - a missing port code forces its name to null
//! - the record id comes from the email, never from the model
//! - weight and volume are rounded and must not be negative
//! - incoterms are uppercased
//!
//! The gatekeeper knows nothing about models or the network; it is a pure
//! function of the raw object and the port index.
//!
//! # Examples
//!
//! ```
//! use shipmail_domain::{PortIndex, PortReference};
//! use shipmail_gatekeeper::Gatekeeper;
//! use serde_json::json;
//!
//! let ports = PortIndex::build(&[PortReference::new("HKHKG", "Hong Kong")]);
//! let raw = json!({"origin_port_code": "HKHKG", "origin_port_name": "HK"});
//!
//! let record = Gatekeeper::default_config()
//!     .repair(raw.as_object().unwrap(), "EMAIL_001", &ports)
//!     .unwrap();
//! assert_eq!(record.origin_port_name.as_deref(), Some("Hong Kong"));
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod repair;

pub use config::RepairConfig;
pub use error::GatekeeperError;
pub use repair::Gatekeeper;
