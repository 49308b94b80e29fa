//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use serde::Serialize;
use shipmail_evaluator::{display_value, EvaluationReport, FieldMismatches, Rating};
use shipmail_extractor::BatchSummary;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Outcome of one setup check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckItem {
    /// What was checked
    pub name: String,

    /// Whether it passed
    pub passed: bool,

    /// Count or failure reason
    pub detail: String,
}

impl CheckItem {
    /// Passing check
    pub fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: detail.into(),
        }
    }

    /// Failing check
    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: detail.into(),
        }
    }
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an evaluation report, with optional mismatch details.
    pub fn format_report(&self, report: &EvaluationReport, details: Option<&[FieldMismatches]>) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "report": report,
                    "rating": report.rating(),
                    "details": details,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let mut out = self.format_report_table(report);
                if let Some(details) = details {
                    out.push_str("\n\n");
                    out.push_str(&self.format_details(details));
                }
                Ok(out)
            }
        }
    }

    /// Format the per-field accuracy table, overall row and rating.
    fn format_report_table(&self, report: &EvaluationReport) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Correct", "Total", "Accuracy"]);

        for score in &report.fields {
            builder.push_record([
                score.field.clone(),
                score.correct.to_string(),
                score.total.to_string(),
                format!("{:.2}%", score.accuracy),
            ]);
        }
        builder.push_record([
            "OVERALL".to_string(),
            report.overall.correct.to_string(),
            report.overall.total.to_string(),
            format!("{:.2}%", report.overall.accuracy),
        ]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut out = table.to_string();

        if !report.identity.missing.is_empty() {
            out.push('\n');
            out.push_str(&self.warning(&format!(
                "Missing ids in output: {}",
                report.identity.missing.join(", ")
            )));
        }
        if !report.identity.extra.is_empty() {
            out.push('\n');
            out.push_str(&self.warning(&format!(
                "Extra ids in output (not scored): {}",
                report.identity.extra.join(", ")
            )));
        }

        let rating = report.rating();
        let color = match rating {
            Rating::Exceptional | Rating::Strong => "green",
            Rating::Acceptable => "yellow",
            Rating::NeedsImprovement => "red",
        };
        out.push_str("\n\nRating: ");
        out.push_str(&self.colorize(&rating.to_string(), color));
        out
    }

    /// Format the detailed mismatch listing.
    pub fn format_details(&self, details: &[FieldMismatches]) -> String {
        if details.is_empty() {
            return self.success("No mismatches.");
        }

        let mut lines = Vec::new();
        for field in details {
            lines.push(self.colorize(
                &format!("{} - {} errors", field.field.to_uppercase(), field.total_errors),
                "cyan",
            ));
            for (i, example) in field.examples.iter().enumerate() {
                lines.push(format!("  {}. {}", i + 1, example.id));
                lines.push(format!("     Expected: {}", display_value(example.expected.as_ref())));
                lines.push(format!("     Got:      {}", display_value(example.got.as_ref())));
            }
            if field.remaining() > 0 {
                lines.push(format!("     ... and {} more", field.remaining()));
            }
        }
        lines.join("\n")
    }

    /// Format the summary printed after a batch extraction.
    pub fn format_summary(&self, summary: &BatchSummary, output_path: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Metric", "Count"]);
                builder.push_record(["Total emails".to_string(), summary.total.to_string()]);
                builder.push_record(["Succeeded".to_string(), summary.succeeded.to_string()]);
                builder.push_record(["No response".to_string(), summary.no_response.to_string()]);
                builder.push_record(["Invalid JSON".to_string(), summary.unparseable.to_string()]);
                builder.push_record(["Failed validation".to_string(), summary.invalid.to_string()]);
                builder.push_record(["With origin port".to_string(), summary.with_origin.to_string()]);

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(format!(
                    "{}\n{}",
                    self.success(&format!("Results saved to: {}", output_path)),
                    table
                ))
            }
        }
    }

    /// Format setup check results.
    pub fn format_checks(&self, items: &[CheckItem]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
            OutputFormat::Table => Ok(items
                .iter()
                .map(|item| {
                    let text = format!("{:<22} {}", item.name, item.detail);
                    if item.passed {
                        self.success(&text)
                    } else {
                        self.error(&text)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
