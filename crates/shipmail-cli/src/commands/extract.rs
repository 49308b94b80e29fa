//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::Result;
use crate::files::{read_json, write_json};
use crate::output::Formatter;
use shipmail_domain::{CompletionProvider, EmailInput, PortIndex, PortReference, ShipmentExtraction};
use shipmail_extractor::{BatchSummary, Extractor, ModelDescriptor};
use shipmail_gatekeeper::Gatekeeper;
use shipmail_llm::{ChatCompletionsProvider, LlmError};
use tracing::info;

/// Execute the extract command against the configured endpoint.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let api_key = config.provider.api_key()?;
    let provider = ChatCompletionsProvider::new(&config.provider.endpoint, api_key, config.provider.timeout())?;

    let summary = run_extraction(provider, &args, config).await?;
    println!("{}", formatter.format_summary(&summary, &args.output)?);

    Ok(())
}

/// Load inputs, extract every email with `provider` and write the records.
///
/// Returns the batch summary. Input files are read before any model call so
/// a bad path fails fast.
pub async fn run_extraction<P>(provider: P, args: &ExtractArgs, config: &Config) -> Result<BatchSummary>
where
    P: CompletionProvider<Error = LlmError>,
{
    let emails: Vec<EmailInput> = read_json(&args.emails)?;
    let references: Vec<PortReference> = read_json(&args.ports)?;
    let ports = PortIndex::build(&references);
    info!(emails = emails.len(), ports = ports.len(), "Inputs loaded");

    let mut extractor_config = config.extractor.clone();
    if let Some(version) = args.prompt_version {
        extractor_config.prompt_version = version.into();
    }
    if !args.models.is_empty() {
        extractor_config.models = args.models.iter().map(ModelDescriptor::new).collect();
    }

    let extractor = Extractor::new(
        provider,
        ports,
        Gatekeeper::new(config.repair.clone()),
        extractor_config,
    )?;

    let outcomes = extractor.extract_batch(&emails).await;
    let records: Vec<&ShipmentExtraction> = outcomes.iter().map(|outcome| &outcome.record).collect();
    write_json(&args.output, &records)?;

    let summary = BatchSummary::from_outcomes(&outcomes);
    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed(),
        output = %args.output,
        "Extraction finished"
    );
    Ok(summary)
}
