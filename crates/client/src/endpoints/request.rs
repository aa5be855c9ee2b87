//! Shared request execution and upstream error mapping.
//!
//! Non-success responses become `Upstream` errors carrying the status, the
//! final URL, and the response body. No retries happen here: the report
//! polling loop owns its own pacing, and everything else fails fast so the
//! orchestrator can classify the failure.

use reqwest::{RequestBuilder, Response};

use crate::error::{ClientError, Result, Service};

/// Basic-auth credentials borrowed for the duration of one request.
#[derive(Clone, Copy)]
pub struct BasicAuth<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> BasicAuth<'a> {
    /// Apply the credentials to a request.
    pub(crate) fn apply(self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(self.username, Some(self.password))
    }
}

/// Execute a request, mapping non-success statuses to `Upstream` errors.
pub async fn send_request(builder: RequestBuilder, service: Service) -> Result<Response> {
    let response = builder.send().await?;
    error_for_status(response, service).await
}

/// Turn a non-success response into an `Upstream` error, reading the body
/// for the message. Success responses pass through untouched.
pub(crate) async fn error_for_status(response: Response, service: Service) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "could not read error response body".to_string());
    Err(ClientError::upstream(service, status, url, message))
}
