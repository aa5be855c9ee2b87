//! Service clients over the endpoint functions.
//!
//! Two independent clients share this module: [`GrafanaClient`] for the
//! metadata service and [`ReportClient`] for the render service. Both are
//! built through builders, hold their own `reqwest::Client`, and attach
//! org/dashboard/report context to errors at this boundary.

mod grafana;
mod report;

pub use grafana::{GrafanaClient, GrafanaClientBuilder};
pub use report::{PollPolicy, ReportClient, ReportClientBuilder};

use crate::error::{ClientError, ErrorKind, Result};

/// Strip trailing slashes and reject empty base URLs.
pub(crate) fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::new(ErrorKind::InvalidUrl(
            "base URL must not be empty".to_string(),
        )));
    }
    Ok(trimmed.to_string())
}
