//! grafana-reporter - automated dashboard reporting from the command line.
//!
//! Responsibilities:
//! - Parse command-line arguments and build the layered configuration.
//! - Drive the reporter client library and print human-readable results.
//!
//! Does NOT handle:
//! - Resolution, job lifecycle, or delivery logic (see `crates/client`).
//!
//! Invariants:
//! - `load_dotenv()` runs BEFORE CLI parsing so `.env` can provide clap
//!   env-backed defaults.
//! - Ctrl-C fires the shared CancellationToken; the summary printed on
//!   cancellation reflects work that completed.

mod args;
mod commands;
mod delivery;
mod error;

use args::Cli;
use clap::Parser;
use error::{ExitCode, ExitCodeExt, is_canceled_error};
use reporter_client::CancellationToken;
use reporter_config::ConfigLoader;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    // Load .env before parsing so clap env defaults can read .env values.
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::ConfigError.as_i32());
    }

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        cancel_clone.cancel();
    });

    let exit_code = match commands::dispatch(cli, &cancel).await {
        Ok(()) => ExitCode::Success,
        Err(e) if is_canceled_error(&e) => {
            eprintln!("Canceled.");
            ExitCode::Interrupted
        }
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
