//! scriptsearch
//!
//! Command-line entry point. Logs go to stderr, results to stdout.

use anyhow::Result;
use clap::Parser;
use scriptsearch_cli::{Cli, commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; `log` records from the library crates are bridged
    let default_filter = if cli.verbose {
        "warn,scriptsearch=debug"
    } else {
        "warn,scriptsearch=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(command = ?cli.command, "Starting scriptsearch");
    commands::run(cli).await
}
