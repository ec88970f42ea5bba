//! `jury` binary entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use jury_client::app::App;
use jury_client::cli::{self, Cli};
use jury_client::config::ClientConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("failed to load configuration")?;
    let config = cli.configure(config)?;

    jury_observability::tracing::init(config.log_format, "warn");
    tracing::debug!(api_url = %config.api_url, token_path = %config.token_path.display(), "starting");

    let app = App::open(config).context("failed to open the session")?;
    cli::run(&app, cli.command).await
}
