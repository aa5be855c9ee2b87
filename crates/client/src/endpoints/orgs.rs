//! Organization listing endpoint.

use reqwest::Client;

use crate::endpoints::request::{BasicAuth, send_request};
use crate::error::{ClientError, Result, Service};
use crate::models::Organization;

/// List all organizations visible to the credentials.
pub async fn list_orgs(
    client: &Client,
    base_url: &str,
    auth: BasicAuth<'_>,
) -> Result<Vec<Organization>> {
    let url = format!("{}/api/orgs", base_url);
    let builder = auth.apply(client.get(&url));
    let response = send_request(builder, Service::Grafana).await?;

    response.json().await.map_err(|e| {
        ClientError::invalid_response(Service::Grafana, format!("organization listing: {e}"))
    })
}
