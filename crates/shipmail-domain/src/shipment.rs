//! Shipment module - the extraction record produced for every email

use serde::{Deserialize, Serialize};

/// Incoterms the prompts ask the model to choose from
pub const INCOTERMS: [&str; 10] = [
    "FOB", "CIF", "CFR", "EXW", "DDP", "DAP", "FCA", "CPT", "CIP", "DPU",
];

/// Whether a shipment is an import or export movement
///
/// Serialized with the product-line identifiers used in the labelled data;
/// the short forms `import` / `export` are accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductLine {
    /// Sea import, less than container load
    #[serde(rename = "pl_sea_import_lcl", alias = "import")]
    Import,

    /// Sea export, less than container load
    #[serde(rename = "pl_sea_export_lcl", alias = "export")]
    Export,
}

impl ProductLine {
    /// Wire identifier of the product line
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductLine::Import => "pl_sea_import_lcl",
            ProductLine::Export => "pl_sea_export_lcl",
        }
    }
}

/// Structured shipment details extracted from one email
///
/// Constructed once (by the gatekeeper, or as a placeholder on failure)
/// and never mutated afterwards. Invariants upheld by construction:
///
/// - a port name is present iff its paired code is present
/// - `incoterm` is uppercase
/// - weight and volume are non-negative and rounded to 2 decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentExtraction {
    /// Identifier of the originating email
    pub id: String,

    /// Import or export classification
    pub product_line: Option<ProductLine>,

    /// UN/LOCODE of the origin port
    pub origin_port_code: Option<String>,

    /// Canonical name of the origin port
    pub origin_port_name: Option<String>,

    /// UN/LOCODE of the destination port
    pub destination_port_code: Option<String>,

    /// Canonical name of the destination port
    pub destination_port_name: Option<String>,

    /// Uppercase incoterm (FOB, CIF, ...)
    pub incoterm: Option<String>,

    /// Cargo weight in kilograms
    pub cargo_weight_kg: Option<f64>,

    /// Cargo volume in cubic meters
    pub cargo_cbm: Option<f64>,

    /// Whether the cargo contains dangerous goods
    #[serde(default)]
    pub is_dangerous: bool,
}

impl ShipmentExtraction {
    /// All-null record emitted when extraction could not be completed
    ///
    /// # Examples
    ///
    /// ```
    /// use shipmail_domain::ShipmentExtraction;
    ///
    /// let record = ShipmentExtraction::placeholder("EMAIL_042");
    /// assert_eq!(record.id, "EMAIL_042");
    /// assert!(record.is_placeholder());
    /// assert!(!record.is_dangerous);
    /// ```
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            product_line: None,
            origin_port_code: None,
            origin_port_name: None,
            destination_port_code: None,
            destination_port_name: None,
            incoterm: None,
            cargo_weight_kg: None,
            cargo_cbm: None,
            is_dangerous: false,
        }
    }

    /// True when every extracted field is empty
    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder(self.id.clone())
    }

    /// True when an origin port was identified
    pub fn has_origin(&self) -> bool {
        self.origin_port_code.is_some()
    }
}

/// Round to a fixed number of decimal places, ties to even
///
/// Rounds the exact binary value, so `10.125` (exactly representable)
/// becomes `10.12` while `2.675` (stored just below) becomes `2.67`.
/// Non-finite values are returned unchanged.
///
/// ```
/// use shipmail_domain::round_decimals;
///
/// assert_eq!(round_decimals(123.456789, 2), 123.46);
/// assert_eq!(round_decimals(500.004, 2), 500.0);
/// assert_eq!(round_decimals(10.125, 2), 10.12);
/// ```
pub fn round_decimals(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // Float formatting is exact and breaks ties to even
    format!("{:.*}", places as usize, value).parse().unwrap_or(value)
}
