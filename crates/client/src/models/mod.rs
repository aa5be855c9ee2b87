//! Data models for metadata-service and report-service responses.
//!
//! Types are organized by resource in submodules and re-exported here
//! for convenient access.

pub mod dashboard;
pub mod org;
pub mod report;

pub use dashboard::{
    DashboardDocument, DashboardEnvelope, DashboardMeta, DashboardSummary, ResolvedDashboard,
    SearchEntry,
};
pub use org::Organization;
pub use report::{CancelOutcome, ReportJob, ReportRequest, ReportStatus, ReportStatusBody};
