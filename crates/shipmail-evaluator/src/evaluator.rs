//! Join two record sets and score them field by field

use crate::comparator::equal;
use crate::records::RecordSet;
use crate::report::{
    EvaluationReport, FieldMismatches, FieldScore, IdentityMismatch, MismatchDetail, OverallScore,
};
use serde_json::Value;
use tracing::{debug, warn};

/// Fields scored, in report order
pub const EVALUATED_FIELDS: [&str; 9] = [
    "product_line",
    "origin_port_code",
    "origin_port_name",
    "destination_port_code",
    "destination_port_name",
    "incoterm",
    "cargo_weight_kg",
    "cargo_cbm",
    "is_dangerous",
];

/// Default number of examples listed per field in mismatch details
pub const DEFAULT_MAX_EXAMPLES: usize = 5;

/// Scores a candidate record set against the ground truth
///
/// The join key is `id`. Every ground-truth id is compared on every field;
/// an id the candidate lacks is wrong on all of them. Candidate-only ids
/// cannot be joined and are reported, not scored.
pub struct Evaluator {
    ground_truth: RecordSet,
    candidate: RecordSet,
    identity: IdentityMismatch,
}

impl Evaluator {
    /// Pair the two sets, warning when their ids differ
    pub fn new(ground_truth: RecordSet, candidate: RecordSet) -> Self {
        let identity = IdentityMismatch {
            missing: ground_truth
                .ids()
                .filter(|id| !candidate.contains(id))
                .map(str::to_string)
                .collect(),
            extra: candidate
                .ids()
                .filter(|id| !ground_truth.contains(id))
                .map(str::to_string)
                .collect(),
        };

        if !identity.missing.is_empty() {
            warn!(ids = ?identity.missing, "Missing ids in candidate output");
        }
        if !identity.extra.is_empty() {
            warn!(ids = ?identity.extra, "Extra ids in candidate output");
        }

        Self {
            ground_truth,
            candidate,
            identity,
        }
    }

    /// Ids present on one side only
    pub fn identity(&self) -> &IdentityMismatch {
        &self.identity
    }

    /// Score one field over every ground-truth id
    pub fn score_field(&self, field: &str) -> FieldScore {
        let mut correct = 0;
        let mut total = 0;
        let mut mismatched_ids = Vec::new();

        for id in self.ground_truth.ids() {
            total += 1;
            let matched = match (self.ground_truth.get(id), self.candidate.get(id)) {
                (Some(expected), Some(actual)) => equal(
                    expected.get(field).unwrap_or(&Value::Null),
                    actual.get(field).unwrap_or(&Value::Null),
                ),
                _ => false,
            };

            if matched {
                correct += 1;
            } else {
                mismatched_ids.push(id.to_string());
            }
        }

        FieldScore {
            field: field.to_string(),
            correct,
            total,
            accuracy: percentage(correct, total),
            mismatched_ids,
        }
    }

    /// Score every evaluated field and the aggregate
    pub fn evaluate(&self) -> EvaluationReport {
        let fields: Vec<FieldScore> = EVALUATED_FIELDS
            .iter()
            .map(|field| self.score_field(field))
            .collect();

        let correct = fields.iter().map(|score| score.correct).sum();
        let total = fields.iter().map(|score| score.total).sum();
        debug!(correct, total, "Evaluation complete");

        EvaluationReport {
            fields,
            overall: OverallScore {
                correct,
                total,
                accuracy: percentage(correct, total),
            },
            identity: self.identity.clone(),
        }
    }

    /// Expected and extracted values for the first failing ids of each field
    ///
    /// Fields without mismatches are skipped.
    pub fn mismatch_details(&self, report: &EvaluationReport, max_examples: usize) -> Vec<FieldMismatches> {
        report
            .fields
            .iter()
            .filter(|score| !score.mismatched_ids.is_empty())
            .map(|score| FieldMismatches {
                field: score.field.clone(),
                total_errors: score.mismatched_ids.len(),
                examples: score
                    .mismatched_ids
                    .iter()
                    .take(max_examples)
                    .map(|id| MismatchDetail {
                        id: id.clone(),
                        expected: lookup(&self.ground_truth, id, &score.field),
                        got: lookup(&self.candidate, id, &score.field),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Score a candidate record set against the ground truth
pub fn evaluate(ground_truth: RecordSet, candidate: RecordSet) -> EvaluationReport {
    Evaluator::new(ground_truth, candidate).evaluate()
}

fn lookup(set: &RecordSet, id: &str, field: &str) -> Option<Value> {
    set.get(id).and_then(|record| record.get(field)).cloned()
}

fn percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn set(value: Value) -> RecordSet {
        RecordSet::from_json(value).unwrap()
    }

    #[test]
    fn test_case_and_rounding_tolerance() {
        let report = evaluate(
            set(json!([{"id": "E1", "incoterm": "FOB", "cargo_weight_kg": 500.0}])),
            set(json!([{"id": "E1", "incoterm": "fob", "cargo_weight_kg": 500.004}])),
        );

        assert_eq!(report.field("incoterm").unwrap().correct, 1);
        assert_eq!(report.field("cargo_weight_kg").unwrap().correct, 1);
        assert_eq!(report.overall.accuracy, 100.0);
        assert_eq!(report.overall.total, EVALUATED_FIELDS.len());
        assert!(report.identity.is_empty());
    }

    #[test]
    fn test_missing_candidate_id_wrong_everywhere() {
        let report = evaluate(
            set(json!([{"id": "E1"}, {"id": "E2", "incoterm": "CIF"}])),
            set(json!([{"id": "E1"}])),
        );

        for score in &report.fields {
            assert_eq!(score.total, 2);
            assert_eq!(score.mismatched_ids, ["E2"]);
            assert_eq!(score.accuracy, 50.0);
        }
        assert_eq!(report.identity.missing, ["E2"]);
        assert!(report.identity.extra.is_empty());
    }

    #[test]
    fn test_extra_candidate_ids_reported_not_scored() {
        let report = evaluate(
            set(json!([{"id": "E1"}])),
            set(json!([{"id": "E1"}, {"id": "E9", "incoterm": "FOB"}])),
        );

        assert_eq!(report.overall.total, EVALUATED_FIELDS.len());
        assert_eq!(report.overall.accuracy, 100.0);
        assert_eq!(report.identity.extra, ["E9"]);
    }

    #[test]
    fn test_missing_keys_read_as_null() {
        let report = evaluate(
            set(json!([{"id": "E1", "incoterm": null}])),
            set(json!([{"id": "E1"}])),
        );
        assert_eq!(report.field("incoterm").unwrap().correct, 1);
    }

    #[test]
    fn test_mismatch_order_follows_ground_truth() {
        let report = evaluate(
            set(json!([
                {"id": "E3", "incoterm": "FOB"},
                {"id": "E1", "incoterm": "FOB"},
                {"id": "E2", "incoterm": "FOB"}
            ])),
            set(json!([
                {"id": "E1", "incoterm": "CIF"},
                {"id": "E2", "incoterm": "FOB"},
                {"id": "E3", "incoterm": "EXW"}
            ])),
        );
        assert_eq!(report.field("incoterm").unwrap().mismatched_ids, ["E3", "E1"]);
    }

    #[test]
    fn test_empty_sets_score_zero() {
        let report = evaluate(RecordSet::default(), RecordSet::default());
        assert_eq!(report.overall.total, 0);
        assert_eq!(report.overall.accuracy, 0.0);
        assert!(report.fields.iter().all(|score| score.accuracy == 0.0));
    }

    #[test]
    fn test_overall_is_macro_count() {
        // incoterm 1/2 right, everything else right: 17 of 18 pairs
        let report = evaluate(
            set(json!([{"id": "E1", "incoterm": "FOB"}, {"id": "E2", "incoterm": "FOB"}])),
            set(json!([{"id": "E1", "incoterm": "FOB"}, {"id": "E2", "incoterm": "CIF"}])),
        );
        assert_eq!(report.overall.correct, 17);
        assert_eq!(report.overall.total, 18);
    }

    #[test]
    fn test_mismatch_details() {
        let ground_truth = set(json!([
            {"id": "E1", "incoterm": "FOB"},
            {"id": "E2", "incoterm": "CIF"},
            {"id": "E3", "incoterm": "EXW"}
        ]));
        let candidate = set(json!([
            {"id": "E1", "incoterm": "DAP"},
            {"id": "E2"}
        ]));

        let evaluator = Evaluator::new(ground_truth, candidate);
        let report = evaluator.evaluate();
        let details = evaluator.mismatch_details(&report, 2);

        // Only E3 (absent) fails on the other fields
        let incoterm = details.iter().find(|d| d.field == "incoterm").unwrap();
        assert_eq!(incoterm.total_errors, 3);
        assert_eq!(incoterm.remaining(), 1);
        assert_eq!(incoterm.examples[0].expected, Some(json!("FOB")));
        assert_eq!(incoterm.examples[0].got, Some(json!("DAP")));
        assert_eq!(incoterm.examples[1].got, None);

        let cbm = details.iter().find(|d| d.field == "cargo_cbm").unwrap();
        assert_eq!(cbm.examples.len(), 1);
        assert_eq!(cbm.examples[0].id, "E3");
        assert_eq!(cbm.examples[0].expected, None);
    }

    #[test]
    fn test_details_skip_clean_fields() {
        let evaluator = Evaluator::new(set(json!([{"id": "E1"}])), set(json!([{"id": "E1"}])));
        let report = evaluator.evaluate();
        assert!(evaluator.mismatch_details(&report, DEFAULT_MAX_EXAMPLES).is_empty());
    }

    fn arb_record(id: usize) -> impl Strategy<Value = Value> {
        (
            proptest::option::of(prop_oneof![Just("FOB"), Just("fob "), Just("CIF")]),
            proptest::option::of(0.0f64..1000.0),
            any::<bool>(),
        )
            .prop_map(move |(incoterm, weight, dangerous)| {
                json!({
                    "id": format!("E{}", id),
                    "incoterm": incoterm,
                    "cargo_weight_kg": weight,
                    "is_dangerous": dangerous,
                })
            })
    }

    fn arb_pair() -> impl Strategy<Value = (Value, Value)> {
        (0usize..12).prop_flat_map(|n| {
            let gt: Vec<_> = (0..n).map(arb_record).collect();
            let out: Vec<_> = (0..n).map(arb_record).collect();
            (gt, out).prop_map(|(gt, out)| (Value::Array(gt), Value::Array(out)))
        })
    }

    proptest! {
        #[test]
        fn accuracy_bounded_and_totals_add_up((gt, out) in arb_pair()) {
            let report = evaluate(set(gt), set(out));
            for score in &report.fields {
                prop_assert!((0.0..=100.0).contains(&score.accuracy));
                prop_assert_eq!(score.correct + score.mismatched_ids.len(), score.total);
            }
            let summed: usize = report.fields.iter().map(|s| s.total).sum();
            prop_assert_eq!(report.overall.total, summed);
            prop_assert!((0.0..=100.0).contains(&report.overall.accuracy));
        }

        #[test]
        fn self_evaluation_is_perfect((gt, _) in arb_pair()) {
            let report = evaluate(set(gt.clone()), set(gt));
            prop_assert!(report.fields.iter().all(|s| s.mismatched_ids.is_empty()));
            if report.overall.total > 0 {
                prop_assert_eq!(report.overall.accuracy, 100.0);
            }
        }
    }
}
