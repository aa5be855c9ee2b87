//! Error types for the reporter client.
//!
//! Responsibilities:
//! - Classify failures into kinds with a fatal-vs-soft split the callers can
//!   match on.
//! - Carry org/dashboard/report identifiers alongside the kind so messages
//!   stay actionable after crossing task boundaries.
//!
//! Does NOT handle:
//! - Exit-code mapping (CLI concern).
//! - Retry/backoff decisions (orchestrator concern).

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::delivery::DeliveryError;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Upstream service an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// The metadata service (organizations, dashboards).
    Grafana,
    /// The asynchronous report-rendering service.
    Reporter,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Grafana => f.write_str("grafana"),
            Service::Reporter => f.write_str("report service"),
        }
    }
}

/// Failure causes for client operations.
#[derive(Error, Debug)]
pub enum ErrorKind {
    /// HTTP transport error (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from an upstream service.
    #[error("{service} error ({status}) at {url}: {message}")]
    Upstream {
        service: Service,
        status: u16,
        url: String,
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("invalid {service} response: {message}")]
    InvalidResponse { service: Service, message: String },

    /// Dashboard document requested before it was cached.
    #[error("dashboard {uid} is not cached")]
    NotCached { uid: String },

    /// Report creation was rejected or returned an unusable job id.
    #[error("report creation failed: {message}")]
    CreateFailed { message: String },

    /// Polling hit the wall-clock deadline before a terminal status.
    #[error("report {report_id} did not reach a terminal status within {max_wait:?}")]
    PollTimeout { report_id: i64, max_wait: Duration },

    /// The service reported the job stopped before completing.
    #[error("report {report_id} failed to render")]
    RenderFailed { report_id: i64 },

    /// The delivery collaborator rejected the artifact.
    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    /// Operation aborted by a cancellation signal.
    #[error("operation canceled")]
    Canceled,

    /// Invalid base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Identifiers attached to an error as it crosses resolution boundaries.
///
/// All fields are optional; boundaries fill in what they know via
/// [`ClientError::with_org`] and friends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub org_id: Option<i64>,
    pub org_name: Option<String>,
    pub dashboard_uid: Option<String>,
    pub report_id: Option<i64>,
}

impl ErrorContext {
    fn is_empty(&self) -> bool {
        self.org_id.is_none()
            && self.org_name.is_none()
            && self.dashboard_uid.is_none()
            && self.report_id.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mut parts = Vec::new();
        match (self.org_id, self.org_name.as_deref()) {
            (Some(id), Some(name)) => parts.push(format!("org {id} ({name})")),
            (Some(id), None) => parts.push(format!("org {id}")),
            (None, Some(name)) => parts.push(format!("org {name}")),
            (None, None) => {}
        }
        if let Some(uid) = &self.dashboard_uid {
            parts.push(format!("dashboard {uid}"));
        }
        if let Some(id) = self.report_id {
            parts.push(format!("report {id}"));
        }
        write!(f, " [{}]", parts.join(", "))
    }
}

/// Error returned by reporter client operations: a [`ErrorKind`] plus the
/// [`ErrorContext`] accumulated on the way out.
#[derive(Debug)]
pub struct ClientError {
    kind: ErrorKind,
    context: ErrorContext,
}

impl ClientError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: ErrorContext::default(),
        }
    }

    /// Non-success response from an upstream service.
    pub fn upstream(
        service: Service,
        status: u16,
        url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::Upstream {
            service,
            status,
            url: url.into(),
            message: message.into(),
        })
    }

    /// Response body with an unexpected shape.
    pub fn invalid_response(service: Service, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidResponse {
            service,
            message: message.into(),
        })
    }

    /// Cache miss surfaced to a caller that skipped the `exists` check.
    pub fn not_cached(uid: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotCached { uid: uid.into() })
    }

    /// Report creation failure (non-success status or unusable body).
    pub fn create_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CreateFailed {
            message: message.into(),
        })
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn context(&self) -> &ErrorContext {
        &self.context
    }

    /// Attach the owning organization.
    pub fn with_org(mut self, id: i64, name: &str) -> Self {
        self.context.org_id = Some(id);
        self.context.org_name = Some(name.to_string());
        self
    }

    /// Attach the dashboard's stable identifier.
    pub fn with_dashboard(mut self, uid: &str) -> Self {
        self.context.dashboard_uid = Some(uid.to_string());
        self
    }

    /// Attach the report job id.
    pub fn with_report(mut self, report_id: i64) -> Self {
        self.context.report_id = Some(report_id);
        self
    }

    /// True for failures of either upstream service (transport, non-success
    /// status, or unparseable body). These are fatal to the calling
    /// operation.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Http(_) | ErrorKind::Upstream { .. } | ErrorKind::InvalidResponse { .. }
        )
    }

    /// HTTP status of the upstream response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_cached(&self) -> bool {
        matches!(self.kind, ErrorKind::NotCached { .. })
    }

    pub fn is_create_failed(&self) -> bool {
        matches!(self.kind, ErrorKind::CreateFailed { .. })
    }

    pub fn is_poll_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::PollTimeout { .. })
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self.kind, ErrorKind::Canceled)
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.context)
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<ErrorKind> for ClientError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(ErrorKind::Http(err))
    }
}

impl From<DeliveryError> for ClientError {
    fn from(err: DeliveryError) -> Self {
        Self::new(ErrorKind::Delivery(err))
    }
}
