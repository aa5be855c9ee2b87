//! CLI command implementations.

pub mod dashboards;
pub mod health;
pub mod orgs;
pub mod report;
pub mod run;

use anyhow::{Context, Result};
use reporter_client::{CancellationToken, GrafanaClient, ReportClient};
use reporter_config::{Config, ConfigLoader};

use crate::args::{Cli, Commands};

/// Apply global and per-command flags as loader overrides, load the
/// configuration, and execute the selected command.
pub async fn dispatch(cli: Cli, cancel: &CancellationToken) -> Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config {
        loader = loader.with_file(path);
    }
    if let Some(url) = cli.grafana_url {
        loader = loader.with_grafana_url(url);
    }
    if let Some(url) = cli.report_url {
        loader = loader.with_report_url(url);
    }

    match cli.command {
        Commands::Run {
            template,
            from,
            to,
            recipient,
            output_dir,
            poll_interval_secs,
            max_wait_secs,
        } => {
            if let Some(template) = template {
                loader = loader.with_template(template);
            }
            if let Some(from) = from {
                loader = loader.with_from(from);
            }
            if let Some(to) = to {
                loader = loader.with_to(to);
            }
            if let Some(recipient) = recipient {
                loader = loader.with_recipient(recipient);
            }
            if let Some(dir) = output_dir {
                loader = loader.with_output_dir(dir);
            }
            if let Some(secs) = poll_interval_secs {
                loader = loader.with_poll_interval(std::time::Duration::from_secs(secs));
            }
            if let Some(secs) = max_wait_secs {
                loader = loader.with_max_wait(std::time::Duration::from_secs(secs));
            }
            run::run(load(loader)?, cancel).await
        }
        Commands::Orgs => orgs::run(load(loader)?, cancel).await,
        Commands::Dashboards { org } => dashboards::run(load(loader)?, org, cancel).await,
        Commands::Report { command } => report::run(load(loader)?, command, cancel).await,
        Commands::Health => health::run(load(loader)?, cancel).await,
    }
}

fn load(loader: ConfigLoader) -> Result<Config> {
    loader.load().context("failed to load configuration")
}

pub(crate) fn build_grafana_client(config: &Config) -> Result<GrafanaClient> {
    GrafanaClient::builder()
        .from_config(config)
        .build()
        .context("failed to build Grafana client")
}

pub(crate) fn build_report_client(config: &Config) -> Result<ReportClient> {
    ReportClient::builder()
        .from_config(config)
        .build()
        .context("failed to build report client")
}
