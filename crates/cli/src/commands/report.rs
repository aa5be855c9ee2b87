//! Report command: operate on a single render job.

use anyhow::Result;
use reporter_client::{CancellationToken, CancelOutcome, ClientError, ErrorKind};
use reporter_config::Config;

use crate::args::ReportCommand;

pub async fn run(config: Config, command: ReportCommand, cancel: &CancellationToken) -> Result<()> {
    let client = super::build_report_client(&config)?;

    match command {
        ReportCommand::Status { report_id } => {
            let status = tokio::select! {
                status = client.status(report_id) => status,
                _ = cancel.canceled() => return Err(canceled()),
            };
            println!("Report {}: {}", report_id, status);
        }
        ReportCommand::Cancel { report_id } => {
            let outcome = tokio::select! {
                outcome = client.cancel(report_id) => outcome,
                _ = cancel.canceled() => return Err(canceled()),
            };
            match outcome {
                CancelOutcome::Canceled => println!("Report {} canceled.", report_id),
                CancelOutcome::RequestFailed { reason } => {
                    anyhow::bail!(
                        "cancel request for report {report_id} failed ({reason}); \
                         the job may still be running"
                    );
                }
            }
        }
        ReportCommand::Log { report_id } => {
            let log = tokio::select! {
                res = client.log(report_id) => res?,
                _ = cancel.canceled() => return Err(canceled()),
            };
            print!("{}", log);
        }
    }
    Ok(())
}

fn canceled() -> anyhow::Error {
    ClientError::new(ErrorKind::Canceled).into()
}
