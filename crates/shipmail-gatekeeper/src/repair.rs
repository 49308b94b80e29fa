//! Validation and repair of raw model output

use crate::{GatekeeperError, RepairConfig};
use serde_json::{Map, Value};
use shipmail_domain::{round_decimals, PortIndex, ProductLine, ShipmentExtraction, INCOTERMS};
use tracing::debug;

/// The Gatekeeper repairs raw extractions into typed records
#[derive(Debug, Clone, Default)]
pub struct Gatekeeper {
    config: RepairConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: RepairConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(RepairConfig::default())
    }

    /// The configuration in force
    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    /// Repair any JSON value, rejecting non-objects
    pub fn repair_value(
        &self,
        raw: &Value,
        email_id: &str,
        ports: &PortIndex,
    ) -> Result<ShipmentExtraction, GatekeeperError> {
        match raw {
            Value::Object(map) => self.repair(map, email_id, ports),
            other => Err(GatekeeperError::NotAnObject(describe(other))),
        }
    }

    /// Repair a raw extraction object into a typed record
    ///
    /// # Arguments
    ///
    /// * `raw` - The object parsed from the model's reply
    /// * `email_id` - Identifier of the email the reply belongs to
    /// * `ports` - Reference index used to canonicalize port names
    ///
    /// Unknown keys are ignored. Missing keys read as null.
    pub fn repair(
        &self,
        raw: &Map<String, Value>,
        email_id: &str,
        ports: &PortIndex,
    ) -> Result<ShipmentExtraction, GatekeeperError> {
        let origin_port_code = optional_string(raw, "origin_port_code")?;
        let destination_port_code = optional_string(raw, "destination_port_code")?;

        // Canonical names for known codes; no name without a code
        let origin_port_name = resolve_port_name(
            origin_port_code.as_deref(),
            optional_string(raw, "origin_port_name")?,
            ports,
        );
        let destination_port_name = resolve_port_name(
            destination_port_code.as_deref(),
            optional_string(raw, "destination_port_name")?,
            ports,
        );

        let cargo_weight_kg = self.quantity(raw, "cargo_weight_kg")?;
        let cargo_cbm = self.quantity(raw, "cargo_cbm")?;
        let incoterm = self.incoterm(raw)?;
        let product_line = product_line(raw)?;
        let is_dangerous = flag(raw, "is_dangerous")?;

        debug!(email_id, "Extraction repaired");

        Ok(ShipmentExtraction {
            id: email_id.to_string(),
            product_line,
            origin_port_code,
            origin_port_name,
            destination_port_code,
            destination_port_name,
            incoterm,
            cargo_weight_kg,
            cargo_cbm,
            is_dangerous,
        })
    }

    /// Weight or volume: rounded, never negative
    fn quantity(
        &self,
        raw: &Map<String, Value>,
        field: &str,
    ) -> Result<Option<f64>, GatekeeperError> {
        let value = match raw.get(field) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(n)) => n.as_f64(),
            // Numeric strings are coerced ("12.5")
            Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Some(_) => None,
        };

        let value = value.ok_or_else(|| type_mismatch(raw, field, "number"))?;
        let rounded = round_decimals(value, self.config.decimal_places);
        if !rounded.is_finite() {
            return Err(GatekeeperError::InvalidValue {
                field: field.to_string(),
                value: rounded.to_string(),
            });
        }
        if rounded < 0.0 {
            return Err(GatekeeperError::NegativeQuantity {
                field: field.to_string(),
                value: rounded,
            });
        }
        Ok(Some(rounded))
    }

    fn incoterm(&self, raw: &Map<String, Value>) -> Result<Option<String>, GatekeeperError> {
        let Some(term) = optional_string(raw, "incoterm")? else {
            return Ok(None);
        };

        let term = term.trim().to_uppercase();
        if self.config.strict_incoterms && !INCOTERMS.contains(&term.as_str()) {
            return Err(GatekeeperError::InvalidValue {
                field: "incoterm".to_string(),
                value: term,
            });
        }
        Ok(Some(term))
    }
}

fn resolve_port_name(code: Option<&str>, raw_name: Option<String>, ports: &PortIndex) -> Option<String> {
    let code = code?;
    match ports.canonical_name(code) {
        Some(canonical) => Some(canonical.to_string()),
        None => raw_name,
    }
}

fn optional_string(raw: &Map<String, Value>, field: &str) -> Result<Option<String>, GatekeeperError> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(type_mismatch(raw, field, "string")),
    }
}

fn product_line(raw: &Map<String, Value>) -> Result<Option<ProductLine>, GatekeeperError> {
    let Some(value) = optional_string(raw, "product_line")? else {
        return Ok(None);
    };

    serde_json::from_value(Value::String(value.clone()))
        .map(Some)
        .map_err(|_| GatekeeperError::InvalidValue {
            field: "product_line".to_string(),
            value,
        })
}

fn flag(raw: &Map<String, Value>, field: &str) -> Result<bool, GatekeeperError> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        // Integer flags: 0 or 1 only
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(false),
        Some(Value::Number(n)) if n.as_f64() == Some(1.0) => Ok(true),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
        Some(_) => Err(type_mismatch(raw, field, "boolean")),
    }
}

fn type_mismatch(raw: &Map<String, Value>, field: &str, expected: &'static str) -> GatekeeperError {
    GatekeeperError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: raw.get(field).map(describe).unwrap_or_else(|| "nothing".to_string()),
    }
}

fn describe(value: &Value) -> String {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    let mut rendered = value.to_string();
    if rendered.len() > 40 {
        let cut = (0..=40).rev().find(|i| rendered.is_char_boundary(*i)).unwrap_or(0);
        rendered.truncate(cut);
        rendered.push_str("...");
    }
    format!("{} {}", kind, rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use shipmail_domain::PortReference;

    fn ports() -> PortIndex {
        PortIndex::build(&[
            PortReference::new("HKHKG", "Hong Kong"),
            PortReference::new("HKHKG", "HK"),
            PortReference::new("INMAA", "Chennai"),
            PortReference::new("CNSHA", "Shanghai"),
        ])
    }

    fn repair(raw: Value) -> Result<ShipmentExtraction, GatekeeperError> {
        Gatekeeper::default_config().repair_value(&raw, "EMAIL_001", &ports())
    }

    #[test]
    fn test_full_record() {
        let record = repair(json!({
            "id": "ignored",
            "product_line": "pl_sea_import_lcl",
            "origin_port_code": "HKHKG",
            "origin_port_name": "Hongkong",
            "destination_port_code": "INMAA",
            "destination_port_name": "Madras",
            "incoterm": "fob",
            "cargo_weight_kg": 123.456789,
            "cargo_cbm": 7.891234,
            "is_dangerous": true
        }))
        .unwrap();

        assert_eq!(record.id, "EMAIL_001");
        assert_eq!(record.product_line, Some(ProductLine::Import));
        assert_eq!(record.origin_port_name.as_deref(), Some("Hong Kong"));
        assert_eq!(record.destination_port_name.as_deref(), Some("Chennai"));
        assert_eq!(record.incoterm.as_deref(), Some("FOB"));
        assert_eq!(record.cargo_weight_kg, Some(123.46));
        assert_eq!(record.cargo_cbm, Some(7.89));
        assert!(record.is_dangerous);
    }

    #[test]
    fn test_known_code_overrides_model_name() {
        let record = repair(json!({"origin_port_code": "HKHKG", "origin_port_name": "HK"})).unwrap();
        assert_eq!(record.origin_port_name.as_deref(), Some("Hong Kong"));
    }

    #[test]
    fn test_known_code_fills_missing_name() {
        let record = repair(json!({"destination_port_code": "CNSHA"})).unwrap();
        assert_eq!(record.destination_port_name.as_deref(), Some("Shanghai"));
    }

    #[test]
    fn test_unknown_code_keeps_model_name() {
        let record = repair(json!({"origin_port_code": "USNYC", "origin_port_name": "New York"})).unwrap();
        assert_eq!(record.origin_port_code.as_deref(), Some("USNYC"));
        assert_eq!(record.origin_port_name.as_deref(), Some("New York"));
    }

    #[test]
    fn test_null_code_forces_null_name() {
        let record = repair(json!({
            "origin_port_code": null,
            "origin_port_name": "Hong Kong",
            "destination_port_name": "Chennai"
        }))
        .unwrap();
        assert!(record.origin_port_name.is_none());
        assert!(record.destination_port_name.is_none());
    }

    #[test]
    fn test_empty_object_is_placeholder() {
        let record = repair(json!({})).unwrap();
        assert_eq!(record, ShipmentExtraction::placeholder("EMAIL_001"));
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let err = repair(json!({"cargo_weight_kg": -5.0})).unwrap_err();
        assert!(matches!(err, GatekeeperError::NegativeQuantity { ref field, .. } if field == "cargo_weight_kg"));

        let err = repair(json!({"cargo_cbm": -0.5})).unwrap_err();
        assert!(matches!(err, GatekeeperError::NegativeQuantity { .. }));
    }

    #[test]
    fn test_zero_quantity_kept() {
        let record = repair(json!({"cargo_weight_kg": 0, "cargo_cbm": 0.0})).unwrap();
        assert_eq!(record.cargo_weight_kg, Some(0.0));
        assert_eq!(record.cargo_cbm, Some(0.0));
    }

    #[test]
    fn test_numeric_string_coerced() {
        let record = repair(json!({"cargo_weight_kg": " 1500.456 "})).unwrap();
        assert_eq!(record.cargo_weight_kg, Some(1500.46));
    }

    #[test]
    fn test_type_mismatches() {
        let err = repair(json!({"cargo_cbm": "TBD"})).unwrap_err();
        assert!(matches!(err, GatekeeperError::TypeMismatch { expected: "number", .. }));

        let err = repair(json!({"origin_port_code": 12345})).unwrap_err();
        assert!(matches!(err, GatekeeperError::TypeMismatch { expected: "string", .. }));

        let err = repair(json!({"is_dangerous": [true]})).unwrap_err();
        assert!(matches!(err, GatekeeperError::TypeMismatch { expected: "boolean", .. }));
    }

    #[test]
    fn test_not_an_object() {
        let err = repair(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, GatekeeperError::NotAnObject(_)));
    }

    #[test]
    fn test_unknown_product_line_rejected() {
        let err = repair(json!({"product_line": "pl_air_import"})).unwrap_err();
        assert!(matches!(err, GatekeeperError::InvalidValue { .. }));
    }

    #[test]
    fn test_lenient_incoterm() {
        let record = repair(json!({"incoterm": " fob or cif "})).unwrap();
        assert_eq!(record.incoterm.as_deref(), Some("FOB OR CIF"));
    }

    #[test]
    fn test_strict_incoterm() {
        let gatekeeper = Gatekeeper::new(RepairConfig::strict());
        let ok = gatekeeper.repair_value(&json!({"incoterm": "cif"}), "E1", &ports());
        assert_eq!(ok.unwrap().incoterm.as_deref(), Some("CIF"));

        let err = gatekeeper.repair_value(&json!({"incoterm": "XYZ"}), "E1", &ports());
        assert!(matches!(err, Err(GatekeeperError::InvalidValue { .. })));
    }

    #[test]
    fn test_dangerous_flag_variants() {
        assert!(repair(json!({"is_dangerous": "TRUE"})).unwrap().is_dangerous);
        assert!(!repair(json!({"is_dangerous": "false"})).unwrap().is_dangerous);
        assert!(!repair(json!({"is_dangerous": null})).unwrap().is_dangerous);
    }

    #[test]
    fn test_dangerous_flag_from_integer() {
        assert!(repair(json!({"is_dangerous": 1})).unwrap().is_dangerous);
        assert!(!repair(json!({"is_dangerous": 0})).unwrap().is_dangerous);

        let err = repair(json!({"is_dangerous": 2})).unwrap_err();
        assert!(matches!(err, GatekeeperError::TypeMismatch { expected: "boolean", .. }));
    }

    #[test]
    fn test_quantity_ties_round_to_even() {
        let record = repair(json!({"cargo_cbm": 0.125, "cargo_weight_kg": "10.125"})).unwrap();
        assert_eq!(record.cargo_cbm, Some(0.12));
        assert_eq!(record.cargo_weight_kg, Some(10.12));
    }

    #[test]
    fn test_huge_quantity_kept_finite() {
        let record = repair(json!({"cargo_weight_kg": f64::MAX})).unwrap();
        assert_eq!(record.cargo_weight_kg, Some(f64::MAX));

        let value = serde_json::to_value(&record).unwrap();
        assert!(value["cargo_weight_kg"].is_number());
    }

    #[test]
    fn test_describe_truncates() {
        let long = Value::String("x".repeat(100));
        let text = describe(&long);
        assert!(text.starts_with("string \""));
        assert!(text.ends_with("..."));
    }

    fn arb_code() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some("HKHKG".to_string())),
            Just(Some("INMAA".to_string())),
            "[A-Z]{5}".prop_map(Some),
        ]
    }

    fn arb_raw() -> impl Strategy<Value = Value> {
        (
            arb_code(),
            proptest::option::of("[A-Za-z ]{0,12}"),
            arb_code(),
            proptest::option::of("[A-Za-z ]{0,12}"),
            proptest::option::of("[a-zA-Z]{3}"),
            proptest::option::of(0.0f64..100_000.0),
            proptest::option::of(0.0f64..500.0),
            any::<bool>(),
        )
            .prop_map(|(oc, on, dc, dn, inc, w, v, dg)| {
                json!({
                    "origin_port_code": oc,
                    "origin_port_name": on,
                    "destination_port_code": dc,
                    "destination_port_name": dn,
                    "incoterm": inc,
                    "cargo_weight_kg": w,
                    "cargo_cbm": v,
                    "is_dangerous": dg,
                })
            })
    }

    proptest! {
        #[test]
        fn repair_is_a_fixed_point(raw in arb_raw()) {
            let gatekeeper = Gatekeeper::default_config();
            let ports = ports();
            let once = gatekeeper.repair_value(&raw, "E1", &ports).unwrap();
            let again = gatekeeper
                .repair_value(&serde_json::to_value(&once).unwrap(), "E1", &ports)
                .unwrap();
            prop_assert_eq!(once, again);
        }

        #[test]
        fn known_origin_code_always_canonical(name in proptest::option::of("[A-Za-z ]{0,12}")) {
            let raw = json!({"origin_port_code": "HKHKG", "origin_port_name": name});
            let record = repair(raw).unwrap();
            prop_assert_eq!(record.origin_port_name.as_deref(), Some("Hong Kong"));
        }

        #[test]
        fn null_code_always_null_name(name in "[A-Za-z ]{1,12}") {
            let raw = json!({"destination_port_code": null, "destination_port_name": name});
            let record = repair(raw).unwrap();
            prop_assert!(record.destination_port_name.is_none());
        }
    }
}
