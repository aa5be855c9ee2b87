//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes scripts can branch on.
//! - Map client and config errors to those codes.
//!
//! Does NOT handle:
//! - Error message formatting (anyhow Display does that).
//!
//! Invariants:
//! - Exit codes 1-5 are reserved for specific failure categories.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + 2).

use reporter_client::{ClientError, ErrorKind};
use reporter_config::ConfigError;

/// Structured exit codes for grafana-reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Command completed; every report delivered.
    Success = 0,

    /// General or partial failure (some reports failed, unexpected error).
    GeneralError = 1,

    /// Configuration problem; fix the flags, environment, or file.
    ConfigError = 2,

    /// A required upstream service was unreachable or answered with a
    /// non-success status. Scripts may retry with backoff.
    UpstreamUnavailable = 3,

    /// The render service rejected a job creation request.
    CreateFailed = 4,

    /// A job did not reach a terminal status within the poll budget.
    PollTimeout = 5,

    /// Interrupted by SIGINT/Ctrl+C.
    Interrupted = 130,
}

impl ExitCode {
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        match err.kind() {
            ErrorKind::Http(_) | ErrorKind::Upstream { .. } | ErrorKind::InvalidResponse { .. } => {
                ExitCode::UpstreamUnavailable
            }
            ErrorKind::CreateFailed { .. } => ExitCode::CreateFailed,
            ErrorKind::PollTimeout { .. } => ExitCode::PollTimeout,
            ErrorKind::Canceled => ExitCode::Interrupted,
            ErrorKind::InvalidUrl(_) => ExitCode::ConfigError,
            ErrorKind::NotCached { .. }
            | ErrorKind::RenderFailed { .. }
            | ErrorKind::Delivery(_) => ExitCode::GeneralError,
        }
    }
}

/// Extract an exit code from an anyhow error by walking its chain.
pub trait ExitCodeExt {
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(client_err) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(client_err);
            }
            if cause.downcast_ref::<ConfigError>().is_some() {
                return ExitCode::ConfigError;
            }
        }
        ExitCode::GeneralError
    }
}

/// True when the error chain bottoms out in a cancellation.
pub fn is_canceled_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<ClientError>()
            .is_some_and(ClientError::is_canceled)
    })
}
