//! Shipmail Domain Layer
//!
//! Value types and trait seams shared by every other shipmail crate.
//! Nothing in here performs I/O; infrastructure lives in the outer crates.
//!
//! ## Key Concepts
//!
//! - **EmailInput**: one freight-forwarding email, immutable, supplied externally
//! - **PortReference / PortIndex**: UN/LOCODE reference data and its
//!   code → canonical-name lookup
//! - **ShipmentExtraction**: the typed record produced for every email
//! - **CompletionProvider**: the boundary to an opaque text-completion service

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod email;
pub mod port;
pub mod shipment;
pub mod traits;

// Re-exports for convenience
pub use email::EmailInput;
pub use port::{PortIndex, PortReference};
pub use shipment::{round_decimals, ProductLine, ShipmentExtraction, INCOTERMS};
pub use traits::{CompletionProvider, CompletionRequest};
