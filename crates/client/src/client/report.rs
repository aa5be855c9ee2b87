//! Render-service client: asynchronous job lifecycle.
//!
//! Responsibilities:
//! - Create, poll, cancel, and download render jobs.
//! - Keep the polling contract honest: `status` never fails outward, and
//!   `cancel` distinguishes confirmed success from a failed request.
//!
//! Does NOT handle:
//! - Deciding when to give up; [`PollPolicy`] is supplied by the caller.
//! - Delivery of finished artifacts (see [`crate::delivery`]).

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::client::normalize_base_url;
use crate::endpoints;
use crate::error::{ErrorKind, Result};
use crate::models::{CancelOutcome, ReportJob, ReportRequest, ReportStatus};

/// Poll pacing and deadline for [`ReportClient::wait`].
///
/// Caller-configured; nothing in the client hardcodes a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two status polls.
    pub interval: Duration,
    /// Wall-clock budget before `wait` gives up with `PollTimeout`.
    pub max_wait: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_wait: Duration::from_secs(300),
        }
    }
}

/// Client for the render service.
#[derive(Debug)]
pub struct ReportClient {
    http: reqwest::Client,
    base_url: String,
}

impl ReportClient {
    /// Start building a client.
    pub fn builder() -> ReportClientBuilder {
        ReportClientBuilder::new()
    }

    /// Submit a render job. The returned job is `Pending` until polled.
    pub async fn create(&self, request: &ReportRequest) -> Result<ReportJob> {
        let id = endpoints::create_report(&self.http, &self.base_url, request).await?;
        debug!(report_id = id, template = %request.template, "created render job");
        Ok(ReportJob {
            id,
            status: ReportStatus::Pending,
            request: request.clone(),
        })
    }

    /// Current status of a job.
    ///
    /// Never fails: transport errors, non-success statuses, and unreadable
    /// bodies are logged and read as `Unknown` so polling loops keep going.
    pub async fn status(&self, report_id: i64) -> ReportStatus {
        match endpoints::get_report_status(&self.http, &self.base_url, report_id).await {
            Ok(body) => {
                let status = body.classify();
                if status == ReportStatus::Unknown {
                    warn!(report_id, raw = %body.status, "unrecognized report status text");
                }
                status
            }
            Err(err) => {
                warn!(report_id, error = %err, "status poll failed, reading as unknown");
                ReportStatus::Unknown
            }
        }
    }

    /// Request cancellation of a job.
    ///
    /// Only [`CancelOutcome::Canceled`] confirms anything; a failed request
    /// says nothing about the job's fate.
    pub async fn cancel(&self, report_id: i64) -> CancelOutcome {
        match endpoints::cancel_report(&self.http, &self.base_url, report_id).await {
            Ok(()) => {
                debug!(report_id, "render job canceled");
                CancelOutcome::Canceled
            }
            Err(err) => {
                warn!(report_id, error = %err, "cancel request failed");
                CancelOutcome::RequestFailed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Download the artifact of a job previously observed `Complete`.
    pub async fn fetch_artifact(&self, report_id: i64) -> Result<Vec<u8>> {
        endpoints::fetch_report(&self.http, &self.base_url, report_id)
            .await
            .map_err(|e| e.with_report(report_id))
    }

    /// Render log of a job, for diagnosing failed renders.
    pub async fn log(&self, report_id: i64) -> Result<String> {
        endpoints::fetch_report_log(&self.http, &self.base_url, report_id)
            .await
            .map_err(|e| e.with_report(report_id))
    }

    /// Poll `status` until a terminal state or the policy deadline.
    ///
    /// `Unknown` counts as "try again later". Fails with `PollTimeout` once
    /// `policy.max_wait` elapses without a terminal state.
    pub async fn wait(&self, report_id: i64, policy: &PollPolicy) -> Result<ReportStatus> {
        let start = Instant::now();
        loop {
            let status = self.status(report_id).await;
            if status.is_terminal() {
                return Ok(status);
            }
            if start.elapsed() > policy.max_wait {
                return Err(ErrorKind::PollTimeout {
                    report_id,
                    max_wait: policy.max_wait,
                }
                .into());
            }
            debug!(report_id, %status, "report not finished, polling again");
            tokio::time::sleep(policy.interval).await;
        }
    }
}

/// Builder for [`ReportClient`].
pub struct ReportClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
}

impl Default for ReportClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ReportClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URL of the render service, e.g. `http://localhost:8989`.
    /// Trailing slashes are removed.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Per-request timeout. Status polls and artifact downloads share it.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pre-populate the builder from loaded configuration.
    pub fn from_config(mut self, config: &reporter_config::Config) -> Self {
        self.base_url = Some(config.report.url.clone());
        self.timeout = config.report.timeout;
        self
    }

    pub fn build(self) -> Result<ReportClient> {
        let base_url = normalize_base_url(self.base_url.as_deref().unwrap_or_default())?;
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;
        Ok(ReportClient { http, base_url })
    }
}
