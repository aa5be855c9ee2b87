//! Client library for automated dashboard reporting.
//!
//! Resolves report-capable dashboards from a Grafana-compatible metadata
//! service, drives an external render service through its asynchronous
//! create/poll/cancel job lifecycle, and hands finished artifacts to a
//! pluggable delivery transport.

pub mod cache;
pub mod cancel;
pub mod client;
pub mod delivery;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod runner;
pub mod variables;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use cache::DashboardCache;
pub use cancel::CancellationToken;
pub use client::{GrafanaClient, GrafanaClientBuilder, PollPolicy, ReportClient, ReportClientBuilder};
pub use delivery::{Delivery, DeliveryError};
pub use endpoints::HealthStatus;
pub use error::{ClientError, ErrorContext, ErrorKind, Result, Service};
pub use models::{
    CancelOutcome, DashboardDocument, DashboardSummary, Organization, ReportJob, ReportRequest,
    ReportStatus, ResolvedDashboard,
};
pub use runner::{OrgSummary, ReportOutcome, ReportRunner, RunOptions, RunSummary};
pub use variables::{VariableMap, extract_variables};
