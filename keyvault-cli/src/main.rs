//! KeyVault CLI - local store for API keys
//!
//! Thin frontend over `keyvault-app`: opens one backend, initializes it, and
//! runs a single command against the storage facade.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use keyvault_app::AppStateBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so command output on stdout stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.storage_config()?;
    tracing::debug!("Data directory: {}", config.data_dir().display());

    let state = AppStateBuilder::new().config(config).build().await?;
    state.run_startup().await?;
    let svc = &state.api_key_service;

    match cli.command {
        Commands::Add(args) => cli::commands::add(svc, args).await,
        Commands::List { json } => cli::commands::list(svc, json).await,
        Commands::Search { query, json } => cli::commands::search(svc, &query, json).await,
    }
}
