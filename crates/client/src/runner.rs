//! Orchestrator driving the full resolve → render → deliver pipeline.
//!
//! Responsibilities:
//! - Fan out resolution per organization, join, then fan out rendering per
//!   dashboard; results are keyed by (organization id, dashboard uid),
//!   never by arrival order.
//! - Absorb failures into the [`RunSummary`]: one organization's fatal error
//!   or one dashboard's failed render never stops its siblings.
//! - Honor the cancellation token at every suspension point, keeping work
//!   that already finished.
//!
//! Does NOT handle:
//! - Pacing/timeouts of a single job; that is [`PollPolicy`]'s job.
//! - Formatting the summary for humans (CLI concern).

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{Instrument, error, info, info_span, warn};

use crate::cancel::CancellationToken;
use crate::client::{GrafanaClient, PollPolicy, ReportClient};
use crate::delivery::Delivery;
use crate::error::{ClientError, ErrorKind};
use crate::models::{Organization, ReportRequest, ReportStatus, ResolvedDashboard};

/// Options for one full run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Template identifier passed to the render service.
    pub template: String,
    /// Start of the rendered time range (opaque, e.g. `now-7d`).
    pub from: String,
    /// End of the rendered time range (opaque, e.g. `now`).
    pub to: String,
    /// Destination address handed to the delivery collaborator.
    pub recipient: String,
    /// Poll pacing and deadline for each job.
    pub poll: PollPolicy,
}

impl RunOptions {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            from: "now-7d".to_string(),
            to: "now".to_string(),
            recipient: String::new(),
            poll: PollPolicy::default(),
        }
    }
}

/// Outcome of one dashboard's render.
#[derive(Debug)]
pub enum ReportOutcome {
    /// Artifact fetched and delivered.
    Delivered { report_id: i64 },
    /// Render or delivery failed; the job id is present when one was
    /// assigned before the failure.
    Failed {
        report_id: Option<i64>,
        error: ClientError,
    },
}

impl ReportOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    fn failed(report_id: Option<i64>, error: ClientError) -> Self {
        Self::Failed { report_id, error }
    }
}

/// One organization's slice of a run.
#[derive(Debug)]
pub struct OrgSummary {
    pub org: Organization,
    /// Fatal error that stopped resolution for this organization.
    /// Dashboards resolved before it still render.
    pub error: Option<ClientError>,
    /// Per-dashboard outcomes, keyed by stable identifier.
    pub outcomes: BTreeMap<String, ReportOutcome>,
}

/// Aggregated result of a full run.
///
/// The runner never returns `Err`; every failure is recorded where it
/// happened so sibling organizations and dashboards keep their results.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Per-organization summaries, keyed by organization id.
    pub organizations: BTreeMap<i64, OrgSummary>,
    /// Error that prevented the organization listing itself.
    pub error: Option<ClientError>,
}

impl RunSummary {
    /// Number of delivered artifacts across all organizations.
    pub fn delivered(&self) -> usize {
        self.organizations
            .values()
            .flat_map(|org| org.outcomes.values())
            .filter(|outcome| outcome.is_delivered())
            .count()
    }

    /// Number of failed dashboards across all organizations.
    pub fn failed(&self) -> usize {
        self.organizations
            .values()
            .flat_map(|org| org.outcomes.values())
            .filter(|outcome| !outcome.is_delivered())
            .count()
    }

    /// True when everything listed, rendered, and delivered.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
            && self
                .organizations
                .values()
                .all(|org| org.error.is_none() && org.outcomes.values().all(ReportOutcome::is_delivered))
    }

    /// True when any recorded failure came from cancellation.
    pub fn was_canceled(&self) -> bool {
        if self.error.as_ref().is_some_and(ClientError::is_canceled) {
            return true;
        }
        self.organizations.values().any(|org| {
            org.error.as_ref().is_some_and(ClientError::is_canceled)
                || org.outcomes.values().any(|outcome| match outcome {
                    ReportOutcome::Failed { error, .. } => error.is_canceled(),
                    ReportOutcome::Delivered { .. } => false,
                })
        })
    }
}

struct OrgResolution {
    org: Organization,
    dashboards: Vec<ResolvedDashboard>,
    error: Option<ClientError>,
}

/// Drives resolution, rendering, and delivery for every organization.
pub struct ReportRunner {
    grafana: Arc<GrafanaClient>,
    report: Arc<ReportClient>,
    delivery: Arc<dyn Delivery>,
    options: RunOptions,
}

impl ReportRunner {
    pub fn new(
        grafana: Arc<GrafanaClient>,
        report: Arc<ReportClient>,
        delivery: Arc<dyn Delivery>,
        options: RunOptions,
    ) -> Self {
        Self {
            grafana,
            report,
            delivery,
            options,
        }
    }

    /// Run the full pipeline.
    ///
    /// Resolution tasks (one per organization) are joined before any render
    /// job is submitted; render tasks then run one per dashboard.
    pub async fn run(&self, cancel: &CancellationToken) -> RunSummary {
        let mut summary = RunSummary::default();

        let orgs = tokio::select! {
            _ = cancel.canceled() => Err(canceled()),
            res = self.grafana.list_organizations() => res,
        };
        let orgs = match orgs {
            Ok(orgs) => orgs,
            Err(err) => {
                error!(error = %err, "organization listing failed");
                summary.error = Some(err);
                return summary;
            }
        };
        info!(count = orgs.len(), "listed organizations");

        let resolutions = join_all(orgs.iter().map(|org| self.resolve_org(org, cancel))).await;

        // Join point: render jobs start only after every organization's
        // resolution has settled.
        let mut pending = Vec::new();
        for resolution in resolutions {
            summary.organizations.insert(
                resolution.org.id,
                OrgSummary {
                    org: resolution.org,
                    error: resolution.error,
                    outcomes: BTreeMap::new(),
                },
            );
            pending.extend(resolution.dashboards);
        }
        info!(count = pending.len(), "resolved dashboards, submitting render jobs");

        let outcomes = join_all(pending.iter().map(|dashboard| {
            let span = info_span!(
                "report",
                uid = %dashboard.summary.uid,
                title = %dashboard.summary.title
            );
            async move {
                let outcome = self.render_one(dashboard, cancel).instrument(span).await;
                (
                    dashboard.summary.org_id,
                    dashboard.summary.uid.clone(),
                    outcome,
                )
            }
        }))
        .await;

        for (org_id, uid, outcome) in outcomes {
            if let Some(org) = summary.organizations.get_mut(&org_id) {
                org.outcomes.insert(uid, outcome);
            }
        }
        summary
    }

    /// Resolve one organization: list its dashboards and their variables.
    ///
    /// A fatal error is recorded and stops this organization's resolution;
    /// dashboards already resolved are kept.
    async fn resolve_org(&self, org: &Organization, cancel: &CancellationToken) -> OrgResolution {
        let span = info_span!("org", id = org.id, name = %org.name);
        async move {
            let mut resolution = OrgResolution {
                org: org.clone(),
                dashboards: Vec::new(),
                error: None,
            };

            let summaries = tokio::select! {
                _ = cancel.canceled() => Err(canceled()),
                res = self.grafana.list_dashboards(org) => res,
            };
            let summaries = match summaries {
                Ok(summaries) => summaries,
                Err(err) => {
                    error!(error = %err, "dashboard listing failed");
                    resolution.error = Some(err);
                    return resolution;
                }
            };

            for summary in summaries {
                if cancel.is_canceled() {
                    resolution.error = Some(canceled());
                    break;
                }
                let variables = tokio::select! {
                    _ = cancel.canceled() => Err(canceled()),
                    res = self.grafana.resolve_variables(&summary.uid) => res,
                };
                match variables {
                    Ok(variables) => resolution.dashboards.push(ResolvedDashboard {
                        summary,
                        variables,
                    }),
                    Err(err) => {
                        let err = err.with_org(org.id, &org.name);
                        error!(error = %err, "variable resolution failed");
                        resolution.error = Some(err);
                        break;
                    }
                }
            }
            resolution
        }
        .instrument(span)
        .await
    }

    /// Create, poll, fetch, and deliver one dashboard's report.
    async fn render_one(
        &self,
        dashboard: &ResolvedDashboard,
        cancel: &CancellationToken,
    ) -> ReportOutcome {
        let summary = &dashboard.summary;
        let in_context = |err: ClientError| {
            err.with_org(summary.org_id, &summary.org_name)
                .with_dashboard(&summary.uid)
        };
        let request = ReportRequest::new(
            self.options.template.clone(),
            self.options.from.clone(),
            self.options.to.clone(),
        )
        .variables(dashboard.variables.clone());

        let job = tokio::select! {
            _ = cancel.canceled() => return ReportOutcome::failed(None, in_context(canceled())),
            res = self.report.create(&request) => match res {
                Ok(job) => job,
                Err(err) => return ReportOutcome::failed(None, in_context(err)),
            },
        };

        let status = tokio::select! {
            _ = cancel.canceled() => {
                // Best effort: ask the service to stop the abandoned job.
                let outcome = self.report.cancel(job.id).await;
                warn!(report_id = job.id, ?outcome, "run canceled while polling");
                return ReportOutcome::failed(Some(job.id), in_context(canceled()));
            }
            res = self.report.wait(job.id, &self.options.poll) => match res {
                Ok(status) => status,
                Err(err) => return ReportOutcome::failed(Some(job.id), in_context(err)),
            },
        };
        if status != ReportStatus::Complete {
            return ReportOutcome::failed(
                Some(job.id),
                in_context(ErrorKind::RenderFailed { report_id: job.id }.into()),
            );
        }

        let artifact = tokio::select! {
            _ = cancel.canceled() => return ReportOutcome::failed(Some(job.id), in_context(canceled())),
            res = self.report.fetch_artifact(job.id) => match res {
                Ok(artifact) => artifact,
                Err(err) => return ReportOutcome::failed(Some(job.id), in_context(err)),
            },
        };
        info!(report_id = job.id, bytes = artifact.len(), "artifact fetched");

        let delivered = tokio::select! {
            _ = cancel.canceled() => return ReportOutcome::failed(Some(job.id), in_context(canceled())),
            res = self
                .delivery
                .deliver(&self.options.recipient, &summary.title, Some(artifact)) => res,
        };
        match delivered {
            Ok(()) => ReportOutcome::Delivered { report_id: job.id },
            Err(err) => {
                ReportOutcome::failed(Some(job.id), in_context(ClientError::from(err)))
            }
        }
    }
}

fn canceled() -> ClientError {
    ErrorKind::Canceled.into()
}
