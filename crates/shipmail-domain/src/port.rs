//! Port module - UN/LOCODE reference data and the canonical-name index

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One entry of the port reference list
///
/// Several entries may share a `code` with different name variants
/// ("Hong Kong", "HK", "Hongkong"). The first one seen is canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortReference {
    /// 5-character UN/LOCODE (2-letter country + 3-letter location)
    pub code: String,

    /// Display name variant for this code
    pub name: String,
}

impl PortReference {
    /// Create a new reference entry
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Lookup from port code to canonical name, plus every alias seen per code
///
/// Built once per run and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use shipmail_domain::{PortIndex, PortReference};
///
/// let index = PortIndex::build(&[
///     PortReference::new("HKHKG", "Hong Kong"),
///     PortReference::new("HKHKG", "HK"),
///     PortReference::new("INMAA", "Chennai"),
/// ]);
///
/// assert_eq!(index.canonical_name("HKHKG"), Some("Hong Kong"));
/// assert_eq!(index.aliases("HKHKG"), ["Hong Kong", "HK"]);
/// assert_eq!(index.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PortIndex {
    canonical: HashMap<String, String>,
    aliases: BTreeMap<String, Vec<String>>,
}

impl PortIndex {
    /// Build the index from reference entries in input order
    ///
    /// The first occurrence of a code determines its canonical name. Later
    /// occurrences only contribute aliases (deduplicated, first-seen order).
    pub fn build(references: &[PortReference]) -> Self {
        let mut canonical = HashMap::new();
        let mut aliases: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for reference in references {
            canonical
                .entry(reference.code.clone())
                .or_insert_with(|| reference.name.clone());

            let names = aliases.entry(reference.code.clone()).or_default();
            if !names.contains(&reference.name) {
                names.push(reference.name.clone());
            }
        }

        Self { canonical, aliases }
    }

    /// Canonical name for a code, if the code is known
    pub fn canonical_name(&self, code: &str) -> Option<&str> {
        self.canonical.get(code).map(String::as_str)
    }

    /// Whether the code appears in the reference list
    pub fn contains(&self, code: &str) -> bool {
        self.canonical.contains_key(code)
    }

    /// All name variants recorded for a code (empty for unknown codes)
    pub fn aliases(&self, code: &str) -> &[String] {
        self.aliases.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct codes
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    /// True when no references were loaded
    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// Human-readable listing for prompt interpolation
    ///
    /// Codes are sorted ascending and capped at `max_entries`; a code with
    /// several aliases lists them comma-joined:
    ///
    /// ```text
    /// - HKHKG: Hong Kong, HK
    /// - INMAA: Chennai
    /// ```
    pub fn reference_listing(&self, max_entries: usize) -> String {
        self.aliases
            .iter()
            .take(max_entries)
            .map(|(code, names)| format!("- {}: {}", code, names.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
