//! Report job models for the render-service API.

use std::fmt;

use serde::Deserialize;

use crate::variables::VariableMap;

/// Lifecycle states of a render job, as seen by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    /// Created; no poll observed yet.
    Pending,
    /// The service reported the job as running.
    Running,
    /// The service reported the job as done.
    Complete,
    /// The service reported the job as stopped or stopping.
    Failed,
    /// Transport failure, non-success status, unreadable body, or an
    /// unrecognized status text. Polling loops treat this as "try again".
    Unknown,
}

impl ReportStatus {
    /// Terminal states end a polling loop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Wire shape of the report status endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct ReportStatusBody {
    #[serde(default)]
    pub report_id: i64,
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub execution_time: f64,
}

impl ReportStatusBody {
    /// Classify the wire status into a client-side state.
    ///
    /// `stopped`/`stopping` win over `done`, so a canceled job that also
    /// reports completion still reads as failed.
    pub fn classify(&self) -> ReportStatus {
        match self.status.as_str() {
            "stopped" | "stopping" => ReportStatus::Failed,
            _ if self.done => ReportStatus::Complete,
            "running" => ReportStatus::Running,
            _ => ReportStatus::Unknown,
        }
    }
}

/// Outcome of a cancellation request.
///
/// Confirmed success and a failed request are distinct; callers that need
/// certainty must poll `status` afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The service confirmed the cancellation with HTTP 200.
    Canceled,
    /// The request errored or the service answered with a non-200 status.
    RequestFailed { reason: String },
}

impl CancelOutcome {
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

/// Creation parameters for one render job.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    /// Template identifier understood by the render service.
    pub template: String,
    /// Start of the rendered time range, passed through opaquely.
    pub from: String,
    /// End of the rendered time range, passed through opaquely.
    pub to: String,
    /// Variable overrides, sent as `var-<name>` query parameters.
    pub variables: VariableMap,
}

impl ReportRequest {
    pub fn new(
        template: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            template: template.into(),
            from: from.into(),
            to: to.into(),
            variables: VariableMap::new(),
        }
    }

    /// Add a single variable override.
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Replace the variable overrides wholesale.
    pub fn variables(mut self, variables: VariableMap) -> Self {
        self.variables = variables;
        self
    }
}

/// A created render job and the parameters that produced it.
#[derive(Debug, Clone)]
pub struct ReportJob {
    /// Identifier assigned by the render service.
    pub id: i64,
    /// Last observed lifecycle state.
    pub status: ReportStatus,
    /// Parameters the job was created with.
    pub request: ReportRequest,
}
