//! Shipmail CLI - extract shipment details from freight emails and grade them.

use clap::Parser;
use shipmail_cli::commands;
use shipmail_cli::{logging, Cli, Command, Config, Formatter};
use std::path::Path;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> shipmail_cli::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    let config = Config::load(cli.config.as_deref().map(Path::new))?;

    let format = cli.format.map(Into::into).unwrap_or(config.report.format);
    let color_enabled = !cli.no_color && config.report.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Extract(args) => commands::execute_extract(args, &config, &formatter).await?,
        Command::Evaluate(args) => commands::execute_evaluate(args, &config, &formatter)?,
        Command::Check(args) => commands::execute_check(args, &config, &formatter)?,
    }

    Ok(())
}
