//! Validated configuration types.
//!
//! Responsibilities:
//! - Hold the final, validated settings the binaries run with.
//! - Keep the Grafana password behind `SecretString` so `Debug` output and
//!   log lines never reveal it.
//!
//! Does NOT handle:
//! - Loading or layering of sources (see `loader`).

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

pub(crate) const DEFAULT_GRAFANA_URL: &str = "http://localhost:3000";
pub(crate) const DEFAULT_REPORT_URL: &str = "http://localhost:8989";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_FROM: &str = "now-7d";
pub(crate) const DEFAULT_TO: &str = "now";
pub(crate) const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
pub(crate) const DEFAULT_MAX_WAIT_SECS: u64 = 300;
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "./reports";

/// Settings for the metadata service.
#[derive(Debug, Clone)]
pub struct GrafanaSettings {
    /// Base URL, normalized without a trailing slash.
    pub url: String,
    pub username: String,
    pub password: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Settings for the render service.
#[derive(Debug, Clone)]
pub struct ReportServiceSettings {
    /// Base URL, normalized without a trailing slash.
    pub url: String,
    /// Per-request timeout; artifact downloads share it.
    pub timeout: Duration,
}

/// Defaults for a full reporting run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Template identifier for the render service. No built-in default;
    /// the `run` command requires it from configuration or a flag.
    pub template: Option<String>,
    /// Start of the rendered time range, passed through opaquely.
    pub from: String,
    /// End of the rendered time range, passed through opaquely.
    pub to: String,
    /// Destination address handed to the delivery collaborator.
    pub recipient: String,
    /// Delay between two status polls.
    pub poll_interval: Duration,
    /// Wall-clock budget per report job.
    pub max_wait: Duration,
    /// Directory artifacts are written into.
    pub output_dir: PathBuf,
}

/// The complete, validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub grafana: GrafanaSettings,
    pub report: ReportServiceSettings,
    pub run: RunSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grafana: GrafanaSettings {
                url: DEFAULT_GRAFANA_URL.to_string(),
                username: String::new(),
                password: SecretString::from(""),
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            },
            report: ReportServiceSettings {
                url: DEFAULT_REPORT_URL.to_string(),
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            },
            run: RunSettings {
                template: None,
                from: DEFAULT_FROM.to_string(),
                to: DEFAULT_TO.to_string(),
                recipient: String::new(),
                poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
                max_wait: Duration::from_secs(DEFAULT_MAX_WAIT_SECS),
                output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.grafana.url, "http://localhost:3000");
        assert_eq!(config.report.url, "http://localhost:8989");
        assert_eq!(config.grafana.timeout, Duration::from_secs(30));
        assert_eq!(config.run.from, "now-7d");
        assert_eq!(config.run.to, "now");
        assert_eq!(config.run.poll_interval, Duration::from_secs(2));
        assert_eq!(config.run.max_wait, Duration::from_secs(300));
        assert_eq!(config.run.output_dir, PathBuf::from("./reports"));
        assert!(config.run.template.is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut config = Config::default();
        config.grafana.password = SecretString::from("hunter2");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("REDACTED"));
    }
}
