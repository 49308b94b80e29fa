//! Check command implementation.

use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::files::read_json;
use crate::output::{CheckItem, Formatter};
use serde_json::Value;
use shipmail_domain::{EmailInput, PortIndex, PortReference};
use shipmail_evaluator::RecordSet;

/// Execute the check command.
///
/// Fails with [`CliError::CheckFailed`] when any check does not pass.
pub fn execute_check(args: CheckArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (items, listing) = run_checks(&args, config);
    println!("{}", formatter.format_checks(&items)?);

    if let Some(listing) = listing {
        println!("\n{}", formatter.info("Port reference sent with each prompt:"));
        println!("{}", listing);
    }

    let failures = items.iter().filter(|item| !item.passed).count();
    if failures > 0 {
        return Err(CliError::CheckFailed(failures));
    }
    Ok(())
}

/// Run every check; the port listing is returned when requested and loadable.
pub fn run_checks(args: &CheckArgs, config: &Config) -> (Vec<CheckItem>, Option<String>) {
    let mut items = Vec::new();
    let mut listing = None;

    items.push(match read_json::<Vec<EmailInput>>(&args.emails) {
        Ok(emails) => CheckItem::pass("emails", format!("Loaded {} emails from {}", emails.len(), args.emails)),
        Err(e) => CheckItem::fail("emails", e.to_string()),
    });

    items.push(match read_json::<Vec<PortReference>>(&args.ports) {
        Ok(references) => {
            let index = PortIndex::build(&references);
            if args.show_ports {
                listing = Some(index.reference_listing(config.extractor.port_reference_limit));
            }
            CheckItem::pass(
                "ports",
                format!("Loaded {} entries, {} distinct codes", references.len(), index.len()),
            )
        }
        Err(e) => CheckItem::fail("ports", e.to_string()),
    });

    let ground_truth = read_json::<Value>(&args.ground_truth)
        .and_then(|document| RecordSet::from_json(document).map_err(CliError::from));
    items.push(match ground_truth {
        Ok(records) => CheckItem::pass("ground truth", format!("Loaded {} records", records.len())),
        Err(e) => CheckItem::fail("ground truth", e.to_string()),
    });

    items.push(match config.validate() {
        Ok(()) => CheckItem::pass(
            "configuration",
            format!(
                "Prompt {} with models {}",
                config.extractor.prompt_version,
                config
                    .extractor
                    .models
                    .iter()
                    .map(|model| model.name.as_str())
                    .collect::<Vec<_>>()
                    .join(" → ")
            ),
        ),
        Err(e) => CheckItem::fail("configuration", e.to_string()),
    });

    items.push(match config.provider.api_key() {
        Ok(_) => CheckItem::pass("api key", format!("{} is set", config.provider.api_key_env)),
        Err(e) => CheckItem::fail("api key", e.to_string()),
    });

    (items, listing)
}
