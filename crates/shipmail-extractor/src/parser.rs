//! Parse model output into a raw JSON object

use crate::error::ExtractorError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static FENCED_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("fenced object pattern is valid")
});

static BARE_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("bare object pattern is valid"));

/// Extract the single JSON object carried by a model reply
///
/// A fenced code block wins over a bare object. The bare search spans from the
/// first `{` to the last `}` in the text. Only syntax is checked here; the
/// gatekeeper judges the contents.
pub fn parse_response(response: &str) -> Result<Value, ExtractorError> {
    let json_str = extract_json(response)
        .ok_or_else(|| ExtractorError::Parse("No JSON object found in response".to_string()))?;

    serde_json::from_str(json_str)
        .map_err(|e| ExtractorError::Parse(format!("JSON parse error: {}", e)))
}

fn extract_json(response: &str) -> Option<&str> {
    if let Some(captures) = FENCED_OBJECT.captures(response) {
        return captures.get(1).map(|m| m.as_str());
    }
    BARE_OBJECT.find(response).map(|m| m.as_str())
}
