//! Structured evaluation results

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Score for one evaluated field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldScore {
    /// Field name
    pub field: String,

    /// Comparisons that matched
    pub correct: usize,

    /// Comparisons made
    pub total: usize,

    /// Percentage in [0, 100]
    pub accuracy: f64,

    /// Ground-truth ids that did not match, in ground-truth order
    pub mismatched_ids: Vec<String>,
}

/// Aggregate over every (id, field) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallScore {
    /// Matching pairs across all fields
    pub correct: usize,

    /// Pairs compared across all fields
    pub total: usize,

    /// Percentage in [0, 100]
    pub accuracy: f64,
}

/// Ids present on one side of the join only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityMismatch {
    /// In the ground truth, absent from the candidate
    pub missing: Vec<String>,

    /// In the candidate, absent from the ground truth
    pub extra: Vec<String>,
}

impl IdentityMismatch {
    /// True when both sides hold the same ids
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Complete result of one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Per-field scores in evaluation order
    pub fields: Vec<FieldScore>,

    /// Aggregate score
    pub overall: OverallScore,

    /// Join mismatches between the two record sets
    pub identity: IdentityMismatch,
}

impl EvaluationReport {
    /// Score for a field by name
    pub fn field(&self, name: &str) -> Option<&FieldScore> {
        self.fields.iter().find(|score| score.field == name)
    }

    /// Rating band of the overall accuracy
    pub fn rating(&self) -> Rating {
        Rating::from_accuracy(self.overall.accuracy)
    }
}

/// Quality band of an overall accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    /// 90% and above
    Exceptional,
    /// 80% to 90%
    Strong,
    /// 70% to 80%
    Acceptable,
    /// Below 70%
    NeedsImprovement,
}

impl Rating {
    /// Band for an accuracy percentage
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 90.0 {
            Rating::Exceptional
        } else if accuracy >= 80.0 {
            Rating::Strong
        } else if accuracy >= 70.0 {
            Rating::Acceptable
        } else {
            Rating::NeedsImprovement
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rating::Exceptional => "EXCEPTIONAL",
            Rating::Strong => "STRONG",
            Rating::Acceptable => "ACCEPTABLE",
            Rating::NeedsImprovement => "NEEDS IMPROVEMENT",
        };
        f.write_str(label)
    }
}

/// Expected and extracted values for one failing id
///
/// `None` means the record or the key was absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MismatchDetail {
    /// Email id
    pub id: String,

    /// Ground-truth value
    pub expected: Option<Value>,

    /// Candidate value
    pub got: Option<Value>,
}

/// Failing examples for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMismatches {
    /// Field name
    pub field: String,

    /// Mismatches for the field in total
    pub total_errors: usize,

    /// The first examples, in ground-truth order
    pub examples: Vec<MismatchDetail>,
}

impl FieldMismatches {
    /// Mismatches not listed in `examples`
    pub fn remaining(&self) -> usize {
        self.total_errors.saturating_sub(self.examples.len())
    }
}

/// Render a detail value the way the report prints it
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "MISSING".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
