//! CLI argument definitions.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//!
//! Does NOT handle:
//! - Executing commands (see `commands`).
//! - Config layering (flags become loader overrides in `commands::dispatch`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grafana-reporter")]
#[command(about = "Render Grafana dashboards into reports and deliver them", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  grafana-reporter run --template nightly --from now-7d --to now\n  grafana-reporter orgs\n  grafana-reporter dashboards --org 1\n  grafana-reporter report status 42\n  grafana-reporter health\n"
)]
pub struct Cli {
    /// Path to the YAML config file (overrides the default location)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the Grafana metadata service (e.g. http://localhost:3000)
    #[arg(long, global = true, env = "REPORTER_GRAFANA_URL")]
    pub grafana_url: Option<String>,

    /// Base URL of the report render service (e.g. http://localhost:8989)
    #[arg(long, global = true, env = "REPORTER_REPORT_URL")]
    pub report_url: Option<String>,

    /// Enable debug logging (RUST_LOG wins when set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve all organizations, render every dashboard, deliver artifacts
    Run {
        /// Template identifier for the render service
        #[arg(long, env = "REPORTER_TEMPLATE")]
        template: Option<String>,

        /// Start of the rendered time range (e.g. 'now-7d')
        #[arg(long, allow_hyphen_values = true)]
        from: Option<String>,

        /// End of the rendered time range (e.g. 'now')
        #[arg(long, allow_hyphen_values = true)]
        to: Option<String>,

        /// Destination address for delivered reports
        #[arg(long)]
        recipient: Option<String>,

        /// Directory finished artifacts are written into
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Seconds between two status polls
        #[arg(long)]
        poll_interval_secs: Option<u64>,

        /// Wall-clock budget per report job, in seconds
        #[arg(long)]
        max_wait_secs: Option<u64>,
    },

    /// List organizations
    Orgs,

    /// List resolved dashboards and their variable counts
    Dashboards {
        /// Restrict to one organization id; omit to walk all organizations
        #[arg(long)]
        org: Option<i64>,
    },

    /// Operate on a single render job
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },

    /// Check metadata service health
    Health,
}

#[derive(Subcommand)]
pub enum ReportCommand {
    /// Show the current status of a job
    Status { report_id: i64 },

    /// Request cancellation of a job
    Cancel { report_id: i64 },

    /// Print the render log of a job
    Log { report_id: i64 },
}
