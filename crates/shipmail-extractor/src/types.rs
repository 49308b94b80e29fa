//! Result types for extraction

use serde::{Deserialize, Serialize};
use shipmail_domain::ShipmentExtraction;
use std::fmt;

/// Terminal state of one email's extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// A model reply parsed and passed repair
    Success,
    /// Every configured model exhausted its attempts
    FailedNoResponse,
    /// The last reply held no recoverable JSON object
    FailedUnparseable,
    /// The last reply parsed but violated the record's rules
    FailedInvalid,
}

impl ExtractionStatus {
    /// True for [`ExtractionStatus::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionStatus::Success)
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExtractionStatus::Success => "success",
            ExtractionStatus::FailedNoResponse => "failed: no response",
            ExtractionStatus::FailedUnparseable => "failed: invalid JSON",
            ExtractionStatus::FailedInvalid => "failed: validation",
        };
        f.write_str(label)
    }
}

/// Record produced for one email plus how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutcome {
    /// The extracted record; a placeholder unless the status is success
    pub record: ShipmentExtraction,

    /// Terminal state reached
    pub status: ExtractionStatus,

    /// Model whose reply produced the record
    pub model: Option<String>,

    /// Cause of the last failure, for failed outcomes
    pub error: Option<String>,
}

impl ExtractionOutcome {
    /// Successful outcome
    pub fn success(record: ShipmentExtraction, model: impl Into<String>) -> Self {
        Self {
            record,
            status: ExtractionStatus::Success,
            model: Some(model.into()),
            error: None,
        }
    }

    /// Failed outcome carrying a placeholder record
    pub fn failure(email_id: &str, status: ExtractionStatus, error: impl Into<String>) -> Self {
        Self {
            record: ShipmentExtraction::placeholder(email_id),
            status,
            model: None,
            error: Some(error.into()),
        }
    }
}

/// Counts over a finished batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Emails processed
    pub total: usize,

    /// Outcomes in the success state
    pub succeeded: usize,

    /// Outcomes where no model answered
    pub no_response: usize,

    /// Outcomes with an unparseable reply
    pub unparseable: usize,

    /// Outcomes rejected by validation
    pub invalid: usize,

    /// Records with an origin port code
    pub with_origin: usize,
}

impl BatchSummary {
    /// Summarize a batch of outcomes
    pub fn from_outcomes(outcomes: &[ExtractionOutcome]) -> Self {
        let mut summary = BatchSummary {
            total: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome.status {
                ExtractionStatus::Success => summary.succeeded += 1,
                ExtractionStatus::FailedNoResponse => summary.no_response += 1,
                ExtractionStatus::FailedUnparseable => summary.unparseable += 1,
                ExtractionStatus::FailedInvalid => summary.invalid += 1,
            }
            if outcome.record.has_origin() {
                summary.with_origin += 1;
            }
        }

        summary
    }

    /// Emails that ended in a failure state
    pub fn failed(&self) -> usize {
        self.no_response + self.unparseable + self.invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut with_port = ShipmentExtraction::placeholder("E1");
        with_port.origin_port_code = Some("HKHKG".to_string());

        let outcomes = vec![
            ExtractionOutcome::success(with_port, "primary"),
            ExtractionOutcome::success(ShipmentExtraction::placeholder("E2"), "primary"),
            ExtractionOutcome::failure("E3", ExtractionStatus::FailedNoResponse, "exhausted"),
            ExtractionOutcome::failure("E4", ExtractionStatus::FailedUnparseable, "no JSON"),
            ExtractionOutcome::failure("E5", ExtractionStatus::FailedInvalid, "negative"),
        ];

        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed(), 3);
        assert_eq!(summary.with_origin, 1);
    }

    #[test]
    fn test_failure_carries_placeholder() {
        let outcome = ExtractionOutcome::failure("E9", ExtractionStatus::FailedInvalid, "bad");
        assert!(outcome.record.is_placeholder());
        assert_eq!(outcome.record.id, "E9");
        assert!(!outcome.status.is_success());
        assert_eq!(outcome.status.to_string(), "failed: validation");
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ExtractionStatus::FailedNoResponse).unwrap();
        assert_eq!(json, r#""failed_no_response""#);
    }
}
