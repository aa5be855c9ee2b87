//! Metadata-service health endpoint.

use reqwest::Client;
use serde::Deserialize;

use crate::endpoints::request::{BasicAuth, send_request};
use crate::error::{ClientError, Result, Service};

/// Health payload of the metadata service.
#[derive(Debug, Deserialize, Clone)]
pub struct HealthStatus {
    #[serde(default)]
    pub commit: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub version: String,
}

impl HealthStatus {
    /// True when the backing database reports itself healthy.
    pub fn is_ok(&self) -> bool {
        self.database == "ok"
    }
}

/// Query the service health endpoint.
pub async fn check_health(
    client: &Client,
    base_url: &str,
    auth: BasicAuth<'_>,
) -> Result<HealthStatus> {
    let url = format!("{}/api/health", base_url);
    let builder = auth.apply(client.get(&url));
    let response = send_request(builder, Service::Grafana).await?;

    response
        .json()
        .await
        .map_err(|e| ClientError::invalid_response(Service::Grafana, format!("health body: {e}")))
}
