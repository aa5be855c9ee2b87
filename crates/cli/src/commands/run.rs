//! Run command: the full resolve → render → deliver pipeline.

use std::sync::Arc;

use anyhow::{Context, Result};
use reporter_client::{
    CancellationToken, ClientError, ErrorKind, PollPolicy, ReportOutcome, ReportRunner,
    RunOptions, RunSummary,
};
use reporter_config::{Config, ConfigError};
use tracing::info;

use crate::delivery::DirectoryDelivery;

pub async fn run(config: Config, cancel: &CancellationToken) -> Result<()> {
    let template = config
        .run
        .template
        .clone()
        .ok_or_else(|| ConfigError::missing_key("template"))
        .context("pass --template or set run.template in the config file")?;

    let grafana = Arc::new(super::build_grafana_client(&config)?);
    let report = Arc::new(super::build_report_client(&config)?);
    let delivery = Arc::new(DirectoryDelivery::new(config.run.output_dir.clone()));

    let mut options = RunOptions::new(template);
    options.from = config.run.from.clone();
    options.to = config.run.to.clone();
    options.recipient = config.run.recipient.clone();
    options.poll = PollPolicy {
        interval: config.run.poll_interval,
        max_wait: config.run.max_wait,
    };

    info!(from = %options.from, to = %options.to, "starting reporting run");
    let runner = ReportRunner::new(grafana, report, delivery, options);
    let mut summary = runner.run(cancel).await;

    print_summary(&summary);

    if summary.was_canceled() {
        return Err(ClientError::new(ErrorKind::Canceled).into());
    }
    if let Some(err) = summary.error.take() {
        return Err(err).context("organization listing failed");
    }
    if !summary.is_success() {
        anyhow::bail!(
            "{} of {} reports failed",
            summary.failed(),
            summary.failed() + summary.delivered()
        );
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "Run finished: {} delivered, {} failed.\n",
        summary.delivered(),
        summary.failed()
    );
    for org in summary.organizations.values() {
        println!("Organization {} ({}):", org.org.id, org.org.name);
        if let Some(err) = &org.error {
            println!("  error: {err}");
        }
        for (uid, outcome) in &org.outcomes {
            match outcome {
                ReportOutcome::Delivered { report_id } => {
                    println!("  {uid}: delivered (report {report_id})");
                }
                ReportOutcome::Failed { report_id, error } => match report_id {
                    Some(id) => println!("  {uid}: failed (report {id}): {error}"),
                    None => println!("  {uid}: failed: {error}"),
                },
            }
        }
        if org.error.is_none() && org.outcomes.is_empty() {
            println!("  no report-capable dashboards");
        }
    }
}
