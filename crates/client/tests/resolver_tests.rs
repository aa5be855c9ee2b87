//! Metadata resolver integration tests.
//!
//! Cover the listing pipeline: org-scoped search, the summary-level and
//! payload-level folder filters, the probe-and-fetch soft-fail rules, and
//! cache interaction.

mod common;

use common::*;
use wiremock::matchers::{header, method, path, query_param};

use reporter_client::models::Organization;

fn acme() -> Organization {
    Organization {
        id: 1,
        name: "Acme".to_string(),
    }
}

#[tokio::test]
async fn test_list_organizations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orgs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "name": "Acme"},
            {"id": 2, "name": "Globex"}
        ])))
        .mount(&server)
        .await;

    let (client, _cache) = grafana_client(&server);
    let orgs = client.list_organizations().await.unwrap();
    assert_eq!(orgs.len(), 2);
    assert_eq!(orgs[0], acme());
}

#[tokio::test]
async fn test_list_organizations_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orgs"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let (client, _cache) = grafana_client(&server);
    let err = client.list_organizations().await.unwrap_err();
    assert!(err.is_upstream());
    assert_eq!(err.status(), Some(502));
}

// Scenario: one org, one plain dashboard without templating resolves to an
// empty variable map.
#[tokio::test]
async fn test_dashboard_without_templating_resolves_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("type", "dashboard-ds"))
        .and(header("X-Grafana-Org-Id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 9, "uid": "abc", "title": "Plain Dashboard", "slug": "plain", "type": "dashboard-ds"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("dashboard_no_templating.json")),
        )
        // One probe plus one fetch.
        .expect(2)
        .mount(&server)
        .await;

    let (client, cache) = grafana_client(&server);
    let summaries = client.list_dashboards(&acme()).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].uid, "abc");
    assert_eq!(summaries[0].org_id, 1);
    assert_eq!(summaries[0].org_name, "Acme");
    assert!(cache.exists("abc"));

    // Resolution comes straight from the cache; no extra HTTP.
    let variables = client.resolve_variables("abc").await.unwrap();
    assert!(variables.is_empty());
}

// Scenario: folder-typed search entries never reach the resolved list and
// never trigger a fetch.
#[tokio::test]
async fn test_folder_entries_filtered_without_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 12, "uid": "ops-folder", "title": "Ops", "type": "dash-folder"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/ops-folder"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (client, cache) = grafana_client(&server);
    let summaries = client.list_dashboards(&acme()).await.unwrap();
    assert!(summaries.is_empty());
    assert!(cache.is_empty());
}

// The summary type tag is not authoritative: a payload marking itself a
// folder is dropped even when the search entry did not.
#[tokio::test]
async fn test_folder_shaped_payload_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 12, "uid": "ops-folder", "title": "Ops", "type": "dashboard-ds"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/ops-folder"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("folder_payload.json")),
        )
        .mount(&server)
        .await;

    let (client, cache) = grafana_client(&server);
    let summaries = client.list_dashboards(&acme()).await.unwrap();
    assert!(summaries.is_empty());
    assert!(!cache.exists("ops-folder"));
}

// Listing races with deletions and permission changes; 404 and 403 on the
// probe drop the entry instead of failing the listing.
#[tokio::test]
async fn test_vanished_and_forbidden_dashboards_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "uid": "gone", "title": "Gone", "type": "dashboard-ds"},
            {"id": 2, "uid": "secret", "title": "Secret", "type": "dashboard-ds"},
            {"id": 3, "uid": "abc", "title": "Plain Dashboard", "type": "dashboard-ds"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/secret"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("dashboard_no_templating.json")),
        )
        .mount(&server)
        .await;

    let (client, _cache) = grafana_client(&server);
    let summaries = client.list_dashboards(&acme()).await.unwrap();
    let uids: Vec<_> = summaries.iter().map(|s| s.uid.as_str()).collect();
    assert_eq!(uids, vec!["abc"]);
}

// A non-404/403 failure during listing is fatal and carries context.
#[tokio::test]
async fn test_probe_server_error_aborts_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "uid": "abc", "title": "Plain Dashboard", "type": "dashboard-ds"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/abc"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .mount(&server)
        .await;

    let (client, _cache) = grafana_client(&server);
    let err = client.list_dashboards(&acme()).await.unwrap_err();
    assert!(err.is_upstream());
    assert_eq!(err.context().org_id, Some(1));
    assert_eq!(err.context().dashboard_uid.as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_search_failure_carries_org_context() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (client, _cache) = grafana_client(&server);
    let err = client.list_dashboards(&acme()).await.unwrap_err();
    assert!(err.is_upstream());
    assert_eq!(err.context().org_id, Some(1));
    assert_eq!(err.context().org_name.as_deref(), Some("Acme"));
}

#[tokio::test]
async fn test_listing_preserves_upstream_order() {
    let server = MockServer::start().await;
    let entries: Vec<_> = ["zeta", "alpha", "mid"]
        .iter()
        .enumerate()
        .map(|(i, uid)| serde_json::json!({"id": i, "uid": uid, "title": uid, "type": "dashboard-ds"}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(entries)))
        .mount(&server)
        .await;
    for uid in ["zeta", "alpha", "mid"] {
        Mock::given(method("GET"))
            .and(path(format!("/api/dashboards/uid/{uid}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"dashboard": {"uid": uid}})),
            )
            .mount(&server)
            .await;
    }

    let (client, _cache) = grafana_client(&server);
    let summaries = client.list_dashboards(&acme()).await.unwrap();
    let uids: Vec<_> = summaries.iter().map(|s| s.uid.as_str()).collect();
    assert_eq!(uids, vec!["zeta", "alpha", "mid"]);
}

#[tokio::test]
async fn test_cached_dashboards_skip_probe_and_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 9, "uid": "abc", "title": "Plain Dashboard", "type": "dashboard-ds"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("dashboard_no_templating.json")),
        )
        // First listing probes and fetches; the second finds the cache warm.
        .expect(2)
        .mount(&server)
        .await;

    let (client, _cache) = grafana_client(&server);
    client.list_dashboards(&acme()).await.unwrap();
    let summaries = client.list_dashboards(&acme()).await.unwrap();
    assert_eq!(summaries.len(), 1);
}

#[tokio::test]
async fn test_resolve_variables_fetches_on_cache_miss() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/sales-ovw"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(load_fixture("dashboard_with_variables.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, cache) = grafana_client(&server);
    let variables = client.resolve_variables("sales-ovw").await.unwrap();
    assert_eq!(variables["site"], "hq");
    assert_eq!(variables["region"], "emea");
    assert_eq!(variables["hosts"], "web-1, web-2");
    assert!(cache.exists("sales-ovw"));

    // Second resolution is served from the cache (expect(1) above).
    let again = client.resolve_variables("sales-ovw").await.unwrap();
    assert_eq!(again, variables);
}

#[tokio::test]
async fn test_resolve_variables_missing_dashboard_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (client, _cache) = grafana_client(&server);
    let err = client.resolve_variables("ghost").await.unwrap_err();
    assert_eq!(err.context().dashboard_uid.as_deref(), Some("ghost"));
}

#[tokio::test]
async fn test_unusual_uid_is_path_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/a%20b"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"dashboard": {"uid": "a b"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, _cache) = grafana_client(&server);
    let variables = client.resolve_variables("a b").await.unwrap();
    assert!(variables.is_empty());
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "commit": "abc123", "database": "ok", "version": "10.4.2"
        })))
        .mount(&server)
        .await;

    let (client, _cache) = grafana_client(&server);
    let health = client.health().await.unwrap();
    assert!(health.is_ok());
    assert_eq!(health.version, "10.4.2");
}
