//! Record sets keyed by id

use crate::EvaluatorError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A JSON object record
pub type Record = Map<String, Value>;

/// Records keyed by their `id`
///
/// Iteration follows the first appearance of each id; when an id repeats,
/// the last record carrying it is the one looked up.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    order: Vec<String>,
    by_id: HashMap<String, Record>,
}

impl RecordSet {
    /// Build from a JSON document that must be an array of objects with ids
    ///
    /// # Errors
    ///
    /// Fails when the document is not an array, an element is not an object,
    /// or an object lacks a string `id`.
    pub fn from_json(document: Value) -> Result<Self, EvaluatorError> {
        let Value::Array(items) = document else {
            return Err(EvaluatorError::NotAnArray(kind(&document).to_string()));
        };

        let mut set = RecordSet::default();
        for (index, item) in items.into_iter().enumerate() {
            let Value::Object(record) = item else {
                return Err(EvaluatorError::NotAnObject { index });
            };
            let id = match record.get("id") {
                Some(Value::String(id)) => id.clone(),
                _ => return Err(EvaluatorError::MissingId { index }),
            };
            set.insert(id, record);
        }
        Ok(set)
    }

    /// Build from typed records
    pub fn from_records<T: Serialize>(records: &[T]) -> Result<Self, EvaluatorError> {
        let document = serde_json::to_value(records)
            .map_err(|e| EvaluatorError::Serialization(e.to_string()))?;
        Self::from_json(document)
    }

    fn insert(&mut self, id: String, record: Record) {
        if !self.by_id.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.by_id.insert(id, record);
    }

    /// Record for an id
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.by_id.get(id)
    }

    /// Whether an id is present
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Distinct ids in first-appearance order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of distinct ids
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the set holds no records
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shipmail_domain::ShipmentExtraction;

    #[test]
    fn test_from_json() {
        let set = RecordSet::from_json(json!([
            {"id": "E1", "incoterm": "FOB"},
            {"id": "E2"}
        ]))
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.ids().collect::<Vec<_>>(), ["E1", "E2"]);
        assert_eq!(set.get("E1").unwrap()["incoterm"], "FOB");
        assert!(!set.contains("E3"));
    }

    #[test]
    fn test_duplicate_ids_last_wins_first_order() {
        let set = RecordSet::from_json(json!([
            {"id": "E2", "incoterm": "CIF"},
            {"id": "E1"},
            {"id": "E2", "incoterm": "FOB"}
        ]))
        .unwrap();
        assert_eq!(set.ids().collect::<Vec<_>>(), ["E2", "E1"]);
        assert_eq!(set.get("E2").unwrap()["incoterm"], "FOB");
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(matches!(
            RecordSet::from_json(json!({"id": "E1"})),
            Err(EvaluatorError::NotAnArray(_))
        ));
        assert_eq!(
            RecordSet::from_json(json!([{"id": "E1"}, 3])).unwrap_err(),
            EvaluatorError::NotAnObject { index: 1 }
        );
        assert_eq!(
            RecordSet::from_json(json!([{"id": 7}])).unwrap_err(),
            EvaluatorError::MissingId { index: 0 }
        );
    }

    #[test]
    fn test_from_typed_records() {
        let records = vec![
            ShipmentExtraction::placeholder("E1"),
            ShipmentExtraction::placeholder("E2"),
        ];
        let set = RecordSet::from_records(&records).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("E2").unwrap()["is_dangerous"], false);
        assert_eq!(set.get("E2").unwrap()["incoterm"], Value::Null);
    }
}
