//! Evaluate command implementation.

use crate::cli::EvaluateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::files::read_json;
use crate::output::Formatter;
use serde_json::Value;
use shipmail_evaluator::{Evaluator, RecordSet};

/// Execute the evaluate command.
pub fn execute_evaluate(args: EvaluateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let rendered = run_evaluation(&args, config, formatter)?;
    println!("{}", rendered);
    Ok(())
}

/// Score the output file against the ground truth and render the report.
pub fn run_evaluation(args: &EvaluateArgs, config: &Config, formatter: &Formatter) -> Result<String> {
    let ground_truth = RecordSet::from_json(read_json::<Value>(&args.ground_truth)?)?;
    let candidate = RecordSet::from_json(read_json::<Value>(&args.output)?)?;

    let evaluator = Evaluator::new(ground_truth, candidate);
    let report = evaluator.evaluate();

    let details = args.details.then(|| {
        let max_examples = args.max_examples.unwrap_or(config.report.max_examples);
        evaluator.mismatch_details(&report, max_examples)
    });

    formatter.format_report(&report, details.as_deref())
}
