//! Shipmail Evaluator
//!
//! Grades extracted shipment records against a labelled ground truth.
//!
//! # Overview
//!
//! Both sides are JSON record sets joined on `id`. Each evaluated field is
//! compared with type-aware rules (case-insensitive strings, numbers rounded
//! to 2 decimals) and scored per field and overall. The result is a plain
//! [`EvaluationReport`]; rendering it is the caller's business.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use shipmail_evaluator::{evaluate, Rating, RecordSet};
//!
//! let truth = RecordSet::from_json(json!([{"id": "E1", "incoterm": "FOB"}])).unwrap();
//! let output = RecordSet::from_json(json!([{"id": "E1", "incoterm": "fob"}])).unwrap();
//!
//! let report = evaluate(truth, output);
//! assert_eq!(report.overall.accuracy, 100.0);
//! assert_eq!(report.rating(), Rating::Exceptional);
//! ```

#![warn(missing_docs)]

mod comparator;
mod error;
mod evaluator;
mod records;
mod report;

pub use comparator::equal;
pub use error::EvaluatorError;
pub use evaluator::{evaluate, Evaluator, DEFAULT_MAX_EXAMPLES, EVALUATED_FIELDS};
pub use records::{Record, RecordSet};
pub use report::{
    display_value, EvaluationReport, FieldMismatches, FieldScore, IdentityMismatch,
    MismatchDetail, OverallScore, Rating,
};
