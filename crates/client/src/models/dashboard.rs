//! Dashboard models for the metadata-service search and dashboard APIs.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::models::Organization;
use crate::variables::VariableMap;

/// Summary type tag the search endpoint uses for folder entries.
pub const FOLDER_TYPE_TAG: &str = "dash-folder";

/// One entry of a dashboard search response.
#[derive(Debug, Deserialize, Clone)]
pub struct SearchEntry {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "folderTitle", default)]
    pub folder_title: Option<String>,
    #[serde(default)]
    pub slug: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl SearchEntry {
    /// True when the summary-level type tag marks a folder.
    ///
    /// Not authoritative on its own; the fetched payload's `meta.isFolder`
    /// is checked again before caching.
    pub fn is_folder(&self) -> bool {
        self.kind == FOLDER_TYPE_TAG
    }
}

/// A dashboard found by listing, carrying its owning organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub id: i64,
    pub uid: String,
    pub title: String,
    pub folder_title: Option<String>,
    pub slug: String,
    pub org_id: i64,
    pub org_name: String,
}

impl DashboardSummary {
    pub fn from_entry(entry: SearchEntry, org: &Organization) -> Self {
        Self {
            id: entry.id,
            uid: entry.uid,
            title: entry.title,
            folder_title: entry.folder_title,
            slug: entry.slug,
            org_id: org.id,
            org_name: org.name.clone(),
        }
    }
}

/// The full definition document of one dashboard.
///
/// Cheap to clone; the underlying JSON tree is shared and read-only once it
/// enters the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardDocument(Arc<Value>);

impl DashboardDocument {
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for DashboardDocument {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// Envelope returned by the dashboard fetch endpoint.
#[derive(Debug, Deserialize)]
pub struct DashboardEnvelope {
    pub dashboard: Value,
    #[serde(default)]
    pub meta: DashboardMeta,
}

/// Fetch metadata; only the folder marker is consumed.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DashboardMeta {
    #[serde(rename = "isFolder", default)]
    pub is_folder: bool,
    #[serde(default)]
    pub slug: String,
    #[serde(rename = "folderTitle", default)]
    pub folder_title: Option<String>,
}

/// A dashboard plus its resolved variables; the unit handed to the runner.
#[derive(Debug, Clone)]
pub struct ResolvedDashboard {
    pub summary: DashboardSummary,
    pub variables: VariableMap,
}
