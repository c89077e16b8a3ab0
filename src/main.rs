use std::process::ExitCode;

use clap::Parser;

use feedo::app::shutdown;
use feedo::cli::Cli;
use feedo::{logging, pipeline};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let settings = cli.into_settings()?;

    logging::init(&settings.log_file, settings.verbose)?;
    tracing::debug!("Initializing.");

    let (trigger, shutdown) = shutdown::channel();
    shutdown::listen_for_signals(trigger);

    let outcome = pipeline::execute(settings, shutdown).await;
    Ok(ExitCode::from(outcome.exit_code()))
}
