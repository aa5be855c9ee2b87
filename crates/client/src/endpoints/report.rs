//! Render-service endpoints: create, status, cancel, artifact, log.
//!
//! All calls address the versioned API base path (`/api/v1`) and carry
//! their parameters in the query string; the service is unauthenticated.

use reqwest::Client;
use serde_json::Value;

use crate::endpoints::request::send_request;
use crate::error::{ClientError, Result, Service};
use crate::models::{ReportRequest, ReportStatusBody};

/// Query parameters of a render request: `var-template`, `from`, `to`,
/// then one `var-<name>` per variable override.
fn render_query(request: &ReportRequest) -> Vec<(String, String)> {
    let mut params = Vec::with_capacity(request.variables.len() + 3);
    if !request.template.is_empty() {
        params.push(("var-template".to_string(), request.template.clone()));
    }
    params.push(("from".to_string(), request.from.clone()));
    params.push(("to".to_string(), request.to.clone()));
    for (name, value) in &request.variables {
        params.push((format!("var-{name}"), value.clone()));
    }
    params
}

/// Submit a render job; returns the assigned job id.
///
/// The id arrives as a string-typed JSON field. Non-success statuses,
/// unreadable bodies, and ids that do not parse as integers are all
/// `CreateFailed`; only transport failures surface as HTTP errors.
pub async fn create_report(client: &Client, base_url: &str, request: &ReportRequest) -> Result<i64> {
    let url = format!("{}/api/v1/render", base_url);
    let response = client.post(&url).query(&render_query(request)).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::create_failed(format!(
            "render returned {}: {}",
            status.as_u16(),
            body
        )));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| ClientError::create_failed(format!("unreadable response body: {e}")))?;
    let raw = body
        .get("report_id")
        .and_then(Value::as_str)
        .ok_or_else(|| ClientError::create_failed("response has no string report_id field"))?;
    raw.parse::<i64>()
        .map_err(|_| ClientError::create_failed(format!("report_id {raw:?} is not an integer")))
}

/// Fetch the raw status body of a job.
///
/// Errors are expected here during service startup and teardown; the
/// client-level wrapper maps every failure to `Unknown`.
pub async fn get_report_status(
    client: &Client,
    base_url: &str,
    report_id: i64,
) -> Result<ReportStatusBody> {
    let url = format!("{}/api/v1/status", base_url);
    let builder = client.get(&url).query(&[("report_id", report_id)]);
    let response = send_request(builder, Service::Reporter).await?;

    response.json().await.map_err(|e| {
        ClientError::invalid_response(Service::Reporter, format!("status body: {e}"))
    })
}

/// Request cancellation of a job. HTTP 200 is the only confirmation.
pub async fn cancel_report(client: &Client, base_url: &str, report_id: i64) -> Result<()> {
    let url = format!("{}/api/v1/cancel", base_url);
    let response = client
        .delete(&url)
        .query(&[("report_id", report_id)])
        .send()
        .await?;
    if response.status().as_u16() == 200 {
        return Ok(());
    }

    let status = response.status().as_u16();
    let url = response.url().to_string();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "could not read error response body".to_string());
    Err(ClientError::upstream(Service::Reporter, status, url, message))
}

/// Download the rendered artifact of a completed job.
pub async fn fetch_report(client: &Client, base_url: &str, report_id: i64) -> Result<Vec<u8>> {
    let url = format!("{}/api/v1/view_report", base_url);
    let builder = client.get(&url).query(&[("report_id", report_id)]);
    let response = send_request(builder, Service::Reporter).await?;
    Ok(response.bytes().await?.to_vec())
}

/// Download the render log of a job, useful for diagnosing failed renders.
pub async fn fetch_report_log(client: &Client, base_url: &str, report_id: i64) -> Result<String> {
    let url = format!("{}/api/v1/view_log", base_url);
    let builder = client.get(&url).query(&[("report_id", report_id)]);
    let response = send_request(builder, Service::Reporter).await?;
    Ok(response.text().await?)
}
