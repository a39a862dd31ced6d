use std::process::ExitCode;

use clap::Parser;
use tracing::{error, Level};

use kraken_import::{
    cli::Cli, configuration::get_configuration, error::Error,
    handler::rewards_import,
};

/// Every currency imported, skipped or already up to date.
const EXIT_OK: u8 = 0;
/// Aborted before importing: config, connection or schema.
const EXIT_ABORTED: u8 = 1;
/// At least one currency failed.
const EXIT_PARTIAL: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match app_main(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!("{}", err);
            ExitCode::from(EXIT_ABORTED)
        },
    }
}

async fn app_main(cli: Cli) -> Result<u8, Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = get_configuration(&cli.config, cli.dir)?;
    let report = rewards_import::execute(config).await?;

    report.log_summary();

    if report.has_failures() {
        return Ok(EXIT_PARTIAL);
    }

    Ok(EXIT_OK)
}
