//! Dashboard search endpoint, scoped to one organization.

use reqwest::Client;

use crate::endpoints::ORG_ID_HEADER;
use crate::endpoints::request::{BasicAuth, send_request};
use crate::error::{ClientError, Result, Service};
use crate::models::SearchEntry;

/// Type filter selecting report-capable dashboards.
const DASHBOARD_TYPE: &str = "dashboard-ds";

/// Search one organization's dashboards.
///
/// The service applies the type filter; folder entries can still appear in
/// the result and are filtered by the caller.
pub async fn search_dashboards(
    client: &Client,
    base_url: &str,
    auth: BasicAuth<'_>,
    org_id: i64,
) -> Result<Vec<SearchEntry>> {
    let url = format!("{}/api/search", base_url);
    let builder = auth
        .apply(client.get(&url))
        .header(ORG_ID_HEADER, org_id.to_string())
        .query(&[("type", DASHBOARD_TYPE)]);
    let response = send_request(builder, Service::Grafana).await?;

    response.json().await.map_err(|e| {
        ClientError::invalid_response(Service::Grafana, format!("dashboard search: {e}"))
    })
}
