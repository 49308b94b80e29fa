//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use shipmail_extractor::PromptVersion;

/// Shipmail - Extract shipment details from freight emails and grade the results.
#[derive(Debug, Parser)]
#[command(name = "shipmail")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SHIPMAIL_CONFIG")]
    pub config: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract shipment records from an email file
    Extract(ExtractArgs),

    /// Grade extracted records against the ground truth
    Evaluate(EvaluateArgs),

    /// Verify input files and settings without calling the model
    Check(CheckArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Email input file (JSON array)
    #[arg(short, long, default_value = "emails_input.json")]
    pub emails: String,

    /// Port reference file (JSON array of {code, name})
    #[arg(short, long, default_value = "port_codes_reference.json")]
    pub ports: String,

    /// Where to write the extracted records
    #[arg(short, long, default_value = "output.json")]
    pub output: String,

    /// Prompt revision, overriding the configuration
    #[arg(long, value_enum)]
    pub prompt_version: Option<PromptVersionArg>,

    /// Models to try in order, overriding the configuration
    #[arg(short, long = "model")]
    pub models: Vec<String>,
}

/// Arguments for the evaluate command.
#[derive(Debug, Parser)]
pub struct EvaluateArgs {
    /// Labelled records (JSON array)
    #[arg(short, long, default_value = "ground_truth.json")]
    pub ground_truth: String,

    /// Extracted records (JSON array)
    #[arg(short, long, default_value = "output.json")]
    pub output: String,

    /// List failing examples per field
    #[arg(short, long)]
    pub details: bool,

    /// Examples listed per field with --details
    #[arg(long)]
    pub max_examples: Option<usize>,
}

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Email input file
    #[arg(short, long, default_value = "emails_input.json")]
    pub emails: String,

    /// Port reference file
    #[arg(short, long, default_value = "port_codes_reference.json")]
    pub ports: String,

    /// Labelled records
    #[arg(short, long, default_value = "ground_truth.json")]
    pub ground_truth: String,

    /// Print the port listing the prompt would carry
    #[arg(long)]
    pub show_ports: bool,
}

/// Prompt revision argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PromptVersionArg {
    /// Basic field list
    V1,
    /// Business rules and port reference
    V2,
    /// Comprehensive rules
    V3,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<PromptVersionArg> for PromptVersion {
    fn from(version: PromptVersionArg) -> Self {
        match version {
            PromptVersionArg::V1 => PromptVersion::V1,
            PromptVersionArg::V2 => PromptVersion::V2,
            PromptVersionArg::V3 => PromptVersion::V3,
        }
    }
}
