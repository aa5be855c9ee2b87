//! Dashboard probe and fetch endpoints.

use reqwest::{Client, RequestBuilder};

use crate::endpoints::ORG_ID_HEADER;
use crate::endpoints::request::{BasicAuth, error_for_status};
use crate::endpoints::url_encoding::encode_path_segment;
use crate::error::{ClientError, Result, Service};
use crate::models::DashboardEnvelope;

fn dashboard_request(
    client: &Client,
    base_url: &str,
    auth: BasicAuth<'_>,
    org_id: Option<i64>,
    uid: &str,
) -> RequestBuilder {
    let url = format!(
        "{}/api/dashboards/uid/{}",
        base_url,
        encode_path_segment(uid)
    );
    let mut builder = auth.apply(client.get(&url));
    if let Some(org_id) = org_id {
        builder = builder.header(ORG_ID_HEADER, org_id.to_string());
    }
    builder
}

/// Check whether a dashboard exists and is accessible.
///
/// `Ok(false)` covers both "not found" and "forbidden": listing races with
/// deletions and permission changes, so these are soft misses rather than
/// errors. Any other non-success status is an error.
pub async fn probe_dashboard(
    client: &Client,
    base_url: &str,
    auth: BasicAuth<'_>,
    org_id: Option<i64>,
    uid: &str,
) -> Result<bool> {
    let response = dashboard_request(client, base_url, auth, org_id, uid)
        .send()
        .await?;
    match response.status().as_u16() {
        403 | 404 => Ok(false),
        _ => {
            error_for_status(response, Service::Grafana).await?;
            Ok(true)
        }
    }
}

/// Fetch the full dashboard envelope by stable identifier.
///
/// `Ok(None)` when the service reports 404: the dashboard disappeared
/// between listing and fetch. Any other failure is an error.
pub async fn fetch_dashboard(
    client: &Client,
    base_url: &str,
    auth: BasicAuth<'_>,
    org_id: Option<i64>,
    uid: &str,
) -> Result<Option<DashboardEnvelope>> {
    let response = dashboard_request(client, base_url, auth, org_id, uid)
        .send()
        .await?;
    if response.status().as_u16() == 404 {
        return Ok(None);
    }
    let response = error_for_status(response, Service::Grafana).await?;

    let envelope = response.json().await.map_err(|e| {
        ClientError::invalid_response(Service::Grafana, format!("dashboard fetch: {e}"))
    })?;
    Ok(Some(envelope))
}
