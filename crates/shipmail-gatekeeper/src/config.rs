//! Gatekeeper configuration

use serde::{Deserialize, Serialize};

/// Configuration for repair rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Decimal places kept on weight and volume
    pub decimal_places: u32,

    /// Reject incoterms outside the known vocabulary
    ///
    /// Off by default: any string is accepted and uppercased.
    pub strict_incoterms: bool,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            decimal_places: 2,
            strict_incoterms: false,
        }
    }
}

impl RepairConfig {
    /// Lenient defaults plus incoterm vocabulary enforcement
    pub fn strict() -> Self {
        Self {
            strict_incoterms: true,
            ..Self::default()
        }
    }
}
