//! Integration tests for layered configuration loading.
//!
//! Environment-dependent tests run serially and scope their variables with
//! `temp_env` so parallel test binaries cannot observe each other's state.

use std::io::Write;
use std::time::Duration;

use secrecy::ExposeSecret;
use serial_test::serial;
use tempfile::NamedTempFile;

use reporter_config::{ConfigError, ConfigLoader, env_var_or_none};

/// All variables the loader reads, for scoping tests hermetically.
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

/// Run `f` with every `REPORTER_*` variable unset, then apply `vars`.
fn with_clean_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
    let mut scoped: Vec<(String, Option<String>)> = REPORTER_VARS
        .iter()
        .map(|key| (key.to_string(), None))
        .collect();
    for (key, value) in vars {
        if let Some(entry) = scoped.iter_mut().find(|(k, _)| k == key) {
            entry.1 = Some(value.to_string());
        }
    }
    temp_env::with_vars(scoped, f);
}

fn yaml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
#[serial]
fn test_defaults_when_nothing_is_set() {
    with_clean_env(&[], || {
        let config = ConfigLoader::new().load().expect("load defaults");
        assert_eq!(config.grafana.url, "http://localhost:3000");
        assert_eq!(config.report.url, "http://localhost:8989");
        assert_eq!(config.run.poll_interval, Duration::from_secs(2));
        assert!(config.run.template.is_none());
    });
}

#[test]
#[serial]
fn test_file_layer_applies() {
    let file = yaml_file(
        "grafana:\n  url: http://grafana.internal:3000/\n  username: reporter\n  password: s3cret\nreport:\n  url: http://renderer.internal:8989\n  timeout_secs: 45\nrun:\n  template: nightly\n  recipient: reports@acme.example\n",
    );
    with_clean_env(&[], || {
        let config = ConfigLoader::new()
            .with_file(file.path())
            .load()
            .expect("load from file");
        assert_eq!(config.grafana.url, "http://grafana.internal:3000");
        assert_eq!(config.grafana.username, "reporter");
        assert_eq!(config.grafana.password.expose_secret(), "s3cret");
        assert_eq!(config.report.timeout, Duration::from_secs(45));
        assert_eq!(config.run.template.as_deref(), Some("nightly"));
        assert_eq!(config.run.recipient, "reports@acme.example");
        // Unset file fields still fall back to defaults.
        assert_eq!(config.run.from, "now-7d");
    });
}

#[test]
#[serial]
fn test_env_beats_file() {
    let file = yaml_file("grafana:\n  url: http://from-file:3000\nrun:\n  template: from-file\n");
    with_clean_env(
        &[
            ("REPORTER_GRAFANA_URL", "http://from-env:3000"),
            ("REPORTER_TEMPLATE", "from-env"),
        ],
        || {
            let config = ConfigLoader::new()
                .with_file(file.path())
                .load()
                .expect("load");
            assert_eq!(config.grafana.url, "http://from-env:3000");
            assert_eq!(config.run.template.as_deref(), Some("from-env"));
        },
    );
}

#[test]
#[serial]
fn test_overrides_beat_env() {
    with_clean_env(
        &[
            ("REPORTER_GRAFANA_URL", "http://from-env:3000"),
            ("REPORTER_MAX_WAIT_SECS", "600"),
        ],
        || {
            let config = ConfigLoader::new()
                .with_grafana_url("http://from-flag:3000")
                .with_max_wait(Duration::from_secs(60))
                .load()
                .expect("load");
            assert_eq!(config.grafana.url, "http://from-flag:3000");
            assert_eq!(config.run.max_wait, Duration::from_secs(60));
        },
    );
}

#[test]
#[serial]
fn test_config_path_env_names_the_file() {
    let file = yaml_file("run:\n  template: via-env-path\n");
    let path = file.path().to_string_lossy().to_string();
    with_clean_env(&[("REPORTER_CONFIG_PATH", &path)], || {
        let config = ConfigLoader::new().load().expect("load");
        assert_eq!(config.run.template.as_deref(), Some("via-env-path"));
    });
}

#[test]
#[serial]
fn test_explicit_missing_file_is_an_error() {
    with_clean_env(&[], || {
        let err = ConfigLoader::new()
            .with_file("/nonexistent/reporter.yaml")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    });
}

#[test]
#[serial]
fn test_malformed_file_is_a_parse_error() {
    let file = yaml_file("grafana: [not, a, mapping\n");
    with_clean_env(&[], || {
        let err = ConfigLoader::new()
            .with_file(file.path())
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileParse { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_env_duration_names_the_variable() {
    with_clean_env(&[("REPORTER_TIMEOUT_SECS", "soon")], || {
        let err = ConfigLoader::new().load().unwrap_err();
        assert!(err.to_string().contains("REPORTER_TIMEOUT_SECS"));
    });
}

#[test]
#[serial]
fn test_zero_poll_interval_rejected() {
    with_clean_env(&[("REPORTER_POLL_INTERVAL_SECS", "0")], || {
        let err = ConfigLoader::new().load().unwrap_err();
        assert!(err.to_string().contains("poll_interval"));
    });
}

#[test]
#[serial]
fn test_invalid_grafana_url_rejected() {
    with_clean_env(&[("REPORTER_GRAFANA_URL", "grafana.internal:3000")], || {
        let err = ConfigLoader::new().load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
        assert!(err.to_string().contains("grafana.url"));
    });
}

#[test]
#[serial]
fn test_empty_env_values_are_unset() {
    with_clean_env(&[("REPORTER_TEMPLATE", "   ")], || {
        assert_eq!(env_var_or_none("REPORTER_TEMPLATE"), None);
        let config = ConfigLoader::new().load().expect("load");
        assert!(config.run.template.is_none());
    });
}

#[test]
#[serial]
fn test_dotenv_disabled_skips_loading() {
    temp_env::with_var("DOTENV_DISABLED", Some("1"), || {
        // Must succeed even if a cwd .env were malformed; the gate short-circuits.
        assert!(ConfigLoader::new().load_dotenv().is_ok());
    });
}
