//! Shared helpers for reporter-client integration tests.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

#[allow(unused_imports)]
pub use reporter_client::testing::load_fixture;
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

use reporter_client::{DashboardCache, GrafanaClient, PollPolicy, ReportClient};

/// Grafana client pointed at a mock server, with a fresh injected cache.
#[allow(dead_code)]
pub fn grafana_client(server: &MockServer) -> (GrafanaClient, Arc<DashboardCache>) {
    let cache = Arc::new(DashboardCache::new());
    let client = GrafanaClient::builder()
        .base_url(server.uri())
        .basic_auth("reporter", SecretString::from("s3cret"))
        .cache(Arc::clone(&cache))
        .build()
        .expect("build grafana client");
    (client, cache)
}

/// Report client pointed at a mock server.
#[allow(dead_code)]
pub fn report_client(server: &MockServer) -> ReportClient {
    ReportClient::builder()
        .base_url(server.uri())
        .build()
        .expect("build report client")
}

/// A poll policy fast enough for tests.
#[allow(dead_code)]
pub fn fast_poll() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(10),
        max_wait: Duration::from_secs(5),
    }
}
