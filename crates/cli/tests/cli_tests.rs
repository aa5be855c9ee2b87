//! End-to-end CLI tests.
//!
//! Tests run hermetically: `DOTENV_DISABLED=1` and a scrubbed environment
//! keep a developer's `.env` or `REPORTER_*` variables from leaking in.

use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPORTER_VARS: &[&str] = &[
    "REPORTER_GRAFANA_URL",
    "REPORTER_GRAFANA_USERNAME",
    "REPORTER_GRAFANA_PASSWORD",
    "REPORTER_REPORT_URL",
    "REPORTER_TIMEOUT_SECS",
    "REPORTER_TEMPLATE",
    "REPORTER_FROM",
    "REPORTER_TO",
    "REPORTER_RECIPIENT",
    "REPORTER_POLL_INTERVAL_SECS",
    "REPORTER_MAX_WAIT_SECS",
    "REPORTER_OUTPUT_DIR",
    "REPORTER_CONFIG_PATH",
];

fn reporter() -> Command {
    let mut cmd = Command::cargo_bin("grafana-reporter").expect("binary builds");
    cmd.env("DOTENV_DISABLED", "1");
    for var in REPORTER_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    reporter()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("orgs"))
        .stdout(predicate::str::contains("dashboards"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("health"));
}

#[test]
fn test_version_flag() {
    reporter()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("grafana-reporter"));
}

#[test]
fn test_run_without_template_is_a_config_error() {
    reporter()
        .arg("run")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("template"));
}

#[test]
fn test_invalid_grafana_url_is_a_config_error() {
    reporter()
        .args(["--grafana-url", "grafana.internal:3000", "orgs"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("grafana.url"));
}

#[test]
fn test_unreachable_grafana_is_upstream_unavailable() {
    // Port 1 is reserved; the connection is refused immediately.
    reporter()
        .args(["--grafana-url", "http://127.0.0.1:1", "orgs"])
        .assert()
        .failure()
        .code(3);
}

#[tokio::test]
async fn test_orgs_lists_organizations() {
    let grafana = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orgs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "name": "Acme"},
            {"id": 2, "name": "Globex"}
        ])))
        .mount(&grafana)
        .await;

    let uri = grafana.uri();
    tokio::task::spawn_blocking(move || {
        reporter()
            .args(["--grafana-url", &uri, "orgs"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Found 2 organizations"))
            .stdout(predicate::str::contains("Acme"))
            .stdout(predicate::str::contains("Globex"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_health_reports_upstream_error() {
    let grafana = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&grafana)
        .await;

    let uri = grafana.uri();
    tokio::task::spawn_blocking(move || {
        reporter()
            .args(["--grafana-url", &uri, "health"])
            .assert()
            .failure()
            .code(3)
            .stderr(predicate::str::contains("503"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_report_status_unknown_on_server_error() {
    let report = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&report)
        .await;

    let uri = report.uri();
    tokio::task::spawn_blocking(move || {
        reporter()
            .args(["--report-url", &uri, "report", "status", "42"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Report 42: unknown"));
    })
    .await
    .unwrap();
}
