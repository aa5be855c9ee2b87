//! Metadata-service client: organizations, dashboards, variables.
//!
//! Responsibilities:
//! - Own the HTTP connection, credentials, and the injected dashboard cache.
//! - Walk organizations → dashboards → variables with the soft/fatal error
//!   split described in [`crate::error`].
//!
//! Does NOT handle:
//! - Render-job lifecycle (see [`crate::client::ReportClient`]).
//! - Retry/backoff (orchestrator concern).
//!
//! Invariants:
//! - Folder documents never reach the cache; both the summary type tag and
//!   the payload's own folder marker are checked.
//! - Listing order is preserved; entries are filtered in place.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::cache::DashboardCache;
use crate::client::normalize_base_url;
use crate::endpoints::{self, BasicAuth, HealthStatus};
use crate::error::{ClientError, Result, Service};
use crate::models::{DashboardDocument, DashboardSummary, Organization};
use crate::variables::{VariableMap, extract_variables};

/// Client for the metadata service.
pub struct GrafanaClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: SecretString,
    cache: Arc<DashboardCache>,
}

impl GrafanaClient {
    /// Start building a client.
    pub fn builder() -> GrafanaClientBuilder {
        GrafanaClientBuilder::new()
    }

    /// The injected dashboard cache.
    pub fn cache(&self) -> &Arc<DashboardCache> {
        &self.cache
    }

    fn auth(&self) -> BasicAuth<'_> {
        BasicAuth {
            username: &self.username,
            password: self.password.expose_secret(),
        }
    }

    /// List all organizations visible to the credentials.
    pub async fn list_organizations(&self) -> Result<Vec<Organization>> {
        endpoints::list_orgs(&self.http, &self.base_url, self.auth()).await
    }

    /// List one organization's report-capable dashboards, cached and ready
    /// for variable resolution.
    ///
    /// Folder entries are filtered out. Dashboards that vanish or turn
    /// forbidden between listing and fetch are dropped with a warning; any
    /// other fetch failure aborts the whole call with org and dashboard
    /// context attached.
    pub async fn list_dashboards(&self, org: &Organization) -> Result<Vec<DashboardSummary>> {
        let entries =
            endpoints::search_dashboards(&self.http, &self.base_url, self.auth(), org.id)
                .await
                .map_err(|e| e.with_org(org.id, &org.name))?;

        let mut summaries = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.is_folder() {
                debug!(uid = %entry.uid, title = %entry.title, "skipping folder entry");
                continue;
            }
            if !self.cache.exists(&entry.uid) {
                let present = endpoints::probe_dashboard(
                    &self.http,
                    &self.base_url,
                    self.auth(),
                    Some(org.id),
                    &entry.uid,
                )
                .await
                .map_err(|e| e.with_org(org.id, &org.name).with_dashboard(&entry.uid))?;
                if !present {
                    warn!(uid = %entry.uid, org_id = org.id, "dashboard vanished or is forbidden, dropping");
                    continue;
                }

                let document = self
                    .fetch_and_cache(Some(org.id), &entry.uid)
                    .await
                    .map_err(|e| e.with_org(org.id, &org.name).with_dashboard(&entry.uid))?;
                if document.is_none() {
                    continue;
                }
            }
            summaries.push(DashboardSummary::from_entry(entry, org));
        }
        Ok(summaries)
    }

    /// Variables of one dashboard, fetching and caching on a miss.
    ///
    /// Unlike listing, a miss here is fatal: the caller asked for a specific
    /// dashboard and there is no healthy way to skip it.
    pub async fn resolve_variables(&self, uid: &str) -> Result<VariableMap> {
        if let Ok(document) = self.cache.get(uid) {
            return Ok(extract_variables(&document));
        }

        let document = self
            .fetch_and_cache(None, uid)
            .await
            .map_err(|e| e.with_dashboard(uid))?
            .ok_or_else(|| {
                ClientError::invalid_response(
                    Service::Grafana,
                    "dashboard is missing or is a folder",
                )
                .with_dashboard(uid)
            })?;
        Ok(extract_variables(&document))
    }

    /// Health of the metadata service.
    pub async fn health(&self) -> Result<HealthStatus> {
        endpoints::check_health(&self.http, &self.base_url, self.auth()).await
    }

    /// Fetch one document, drop folder payloads, cache on success.
    ///
    /// `Ok(None)` means the dashboard should be skipped: it disappeared
    /// after listing or its payload marks a folder.
    async fn fetch_and_cache(
        &self,
        org_id: Option<i64>,
        uid: &str,
    ) -> Result<Option<DashboardDocument>> {
        let envelope =
            endpoints::fetch_dashboard(&self.http, &self.base_url, self.auth(), org_id, uid)
                .await?;
        let Some(envelope) = envelope else {
            warn!(uid, "dashboard disappeared between listing and fetch, dropping");
            return Ok(None);
        };
        if envelope.meta.is_folder {
            debug!(uid, "payload marks a folder, dropping");
            return Ok(None);
        }

        let document = DashboardDocument::new(envelope.dashboard);
        self.cache.put(uid, document.clone());
        Ok(Some(document))
    }
}

impl std::fmt::Debug for GrafanaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrafanaClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("cached_documents", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`GrafanaClient`].
///
/// `base_url` is required; everything else has defaults. The cache can be
/// shared across clients by passing the same `Arc`.
pub struct GrafanaClientBuilder {
    base_url: Option<String>,
    username: String,
    password: Option<SecretString>,
    timeout: Duration,
    cache: Option<Arc<DashboardCache>>,
}

impl Default for GrafanaClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            username: String::new(),
            password: None,
            timeout: Duration::from_secs(30),
            cache: None,
        }
    }
}

impl GrafanaClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URL of the metadata service, e.g. `http://localhost:3000`.
    /// Trailing slashes are removed.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Basic-auth credentials.
    pub fn basic_auth(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.username = username.into();
        self.password = Some(password);
        self
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Inject a dashboard cache; a fresh empty one is created otherwise.
    pub fn cache(mut self, cache: Arc<DashboardCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Pre-populate the builder from loaded configuration.
    pub fn from_config(mut self, config: &reporter_config::Config) -> Self {
        self.base_url = Some(config.grafana.url.clone());
        self.username = config.grafana.username.clone();
        self.password = Some(config.grafana.password.clone());
        self.timeout = config.grafana.timeout;
        self
    }

    pub fn build(self) -> Result<GrafanaClient> {
        let base_url = normalize_base_url(self.base_url.as_deref().unwrap_or_default())?;
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;
        Ok(GrafanaClient {
            http,
            base_url,
            username: self.username,
            password: self.password.unwrap_or_else(|| SecretString::from("")),
            cache: self.cache.unwrap_or_default(),
        })
    }
}
