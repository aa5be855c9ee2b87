//! REST endpoint implementations for both upstream services.
//!
//! Free functions over a shared `reqwest::Client`; the client structs in
//! [`crate::client`] wrap these with credentials, caching, and context
//! attachment.

pub mod dashboards;
pub mod health;
pub mod orgs;
pub mod report;
mod request;
pub mod search;
pub mod url_encoding;

pub use dashboards::{fetch_dashboard, probe_dashboard};
pub use health::{HealthStatus, check_health};
pub use orgs::list_orgs;
pub use report::{
    cancel_report, create_report, fetch_report, fetch_report_log, get_report_status,
};
pub use request::{BasicAuth, send_request};
pub use search::search_dashboards;
pub use url_encoding::encode_path_segment;

/// Header scoping metadata-service calls to one organization.
pub(crate) const ORG_ID_HEADER: &str = "X-Grafana-Org-Id";
