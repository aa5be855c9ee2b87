//! Layered configuration loading.
//!
//! Responsibilities:
//! - Merge explicit overrides, `REPORTER_*` environment variables, an
//!   optional YAML file, and built-in defaults — in that precedence order.
//! - Validate URLs and durations before handing out a [`Config`].
//!
//! Does NOT handle:
//! - Command-line parsing; the CLI feeds flag values in as overrides.
//!
//! Invariants:
//! - `load_dotenv()` is explicit and gated on `DOTENV_DISABLED`.
//! - Empty or whitespace-only environment variables are treated as unset.
//! - An explicitly named config file must exist; the default location is
//!   optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::types::{
    Config, DEFAULT_FROM, DEFAULT_GRAFANA_URL, DEFAULT_MAX_WAIT_SECS, DEFAULT_OUTPUT_DIR,
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REPORT_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_TO,
    GrafanaSettings, ReportServiceSettings, RunSettings,
};

/// Read an environment variable, treating empty or whitespace-only values
/// as unset. Returned values are trimmed.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Raw file shape. Every section and field is optional; the loader fills
/// gaps from lower-precedence sources.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    grafana: FileGrafana,
    #[serde(default)]
    report: FileReport,
    #[serde(default)]
    run: FileRun,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileGrafana {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileReport {
    url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileRun {
    template: Option<String>,
    from: Option<String>,
    to: Option<String>,
    recipient: Option<String>,
    poll_interval_secs: Option<u64>,
    max_wait_secs: Option<u64>,
    output_dir: Option<PathBuf>,
}

/// Builder merging configuration sources into a [`Config`].
///
/// Overrides set through `with_*` methods beat environment variables, which
/// beat the file, which beats the defaults.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    grafana_url: Option<String>,
    grafana_username: Option<String>,
    grafana_password: Option<SecretString>,
    report_url: Option<String>,
    timeout: Option<Duration>,
    template: Option<String>,
    from: Option<String>,
    to: Option<String>,
    recipient: Option<String>,
    poll_interval: Option<Duration>,
    max_wait: Option<Duration>,
    output_dir: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from a `.env` file if present.
    ///
    /// Skipped entirely when `DOTENV_DISABLED` is `true` or `1`. A missing
    /// file is fine; a malformed one is a hard error whose message carries
    /// only the byte position, never file contents.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Use an explicit config file path. Unlike the default location, the
    /// named file must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_grafana_url(mut self, url: impl Into<String>) -> Self {
        self.grafana_url = Some(url.into());
        self
    }

    pub fn with_grafana_username(mut self, username: impl Into<String>) -> Self {
        self.grafana_username = Some(username.into());
        self
    }

    pub fn with_grafana_password(mut self, password: SecretString) -> Self {
        self.grafana_password = Some(password);
        self
    }

    pub fn with_report_url(mut self, url: impl Into<String>) -> Self {
        self.report_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Merge all sources and validate the result.
    pub fn load(self) -> Result<Config, ConfigError> {
        let file = self.read_file()?;
        let env = EnvValues::read()?;

        let grafana_url = self
            .grafana_url
            .or(env.grafana_url)
            .or(file.grafana.url)
            .unwrap_or_else(|| DEFAULT_GRAFANA_URL.to_string());
        let report_url = self
            .report_url
            .or(env.report_url)
            .or(file.report.url)
            .unwrap_or_else(|| DEFAULT_REPORT_URL.to_string());

        let grafana_timeout = self
            .timeout
            .or(env.timeout)
            .or(file.grafana.timeout_secs.map(Duration::from_secs))
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let report_timeout = self
            .timeout
            .or(env.timeout)
            .or(file.report.timeout_secs.map(Duration::from_secs))
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let poll_interval = self
            .poll_interval
            .or(env.poll_interval)
            .or(file.run.poll_interval_secs.map(Duration::from_secs))
            .unwrap_or(Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS));
        let max_wait = self
            .max_wait
            .or(env.max_wait)
            .or(file.run.max_wait_secs.map(Duration::from_secs))
            .unwrap_or(Duration::from_secs(DEFAULT_MAX_WAIT_SECS));

        validate_positive("timeout", grafana_timeout)?;
        validate_positive("timeout", report_timeout)?;
        validate_positive("poll_interval", poll_interval)?;
        validate_positive("max_wait", max_wait)?;

        Ok(Config {
            grafana: GrafanaSettings {
                url: validate_base_url("grafana.url", &grafana_url)?,
                username: self
                    .grafana_username
                    .or(env.grafana_username)
                    .or(file.grafana.username)
                    .unwrap_or_default(),
                password: self
                    .grafana_password
                    .or(env.grafana_password)
                    .or(file.grafana.password.map(SecretString::from))
                    .unwrap_or_else(|| SecretString::from("")),
                timeout: grafana_timeout,
            },
            report: ReportServiceSettings {
                url: validate_base_url("report.url", &report_url)?,
                timeout: report_timeout,
            },
            run: RunSettings {
                template: self.template.or(env.template).or(file.run.template),
                from: self
                    .from
                    .or(env.from)
                    .or(file.run.from)
                    .unwrap_or_else(|| DEFAULT_FROM.to_string()),
                to: self
                    .to
                    .or(env.to)
                    .or(file.run.to)
                    .unwrap_or_else(|| DEFAULT_TO.to_string()),
                recipient: self
                    .recipient
                    .or(env.recipient)
                    .or(file.run.recipient)
                    .unwrap_or_default(),
                poll_interval,
                max_wait,
                output_dir: self
                    .output_dir
                    .or(env.output_dir)
                    .or(file.run.output_dir)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            },
        })
    }

    /// Read the YAML file layer.
    ///
    /// Resolution order: explicit `with_file` path, `REPORTER_CONFIG_PATH`,
    /// then the per-user default location. Only the default location may be
    /// silently absent.
    fn read_file(&self) -> Result<FileConfig, ConfigError> {
        let explicit = self
            .config_path
            .clone()
            .or_else(|| env_var_or_none("REPORTER_CONFIG_PATH").map(PathBuf::from));

        if let Some(path) = explicit {
            return parse_file(&path);
        }

        let Some(path) = default_file_path() else {
            debug!("no user config directory available, skipping config file");
            return Ok(FileConfig::default());
        };
        if !path.exists() {
            debug!(path = %path.display(), "no config file at default location");
            return Ok(FileConfig::default());
        }
        parse_file(&path)
    }
}

/// Per-user default config file location.
fn default_file_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "grafana-reporter")
        .map(|dirs| dirs.config_dir().join("reporter.yaml"))
}

fn parse_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let file = serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), "loaded config file");
    Ok(file)
}

/// The environment layer, read in one pass.
#[derive(Debug, Default)]
struct EnvValues {
    grafana_url: Option<String>,
    grafana_username: Option<String>,
    grafana_password: Option<SecretString>,
    report_url: Option<String>,
    timeout: Option<Duration>,
    template: Option<String>,
    from: Option<String>,
    to: Option<String>,
    recipient: Option<String>,
    poll_interval: Option<Duration>,
    max_wait: Option<Duration>,
    output_dir: Option<PathBuf>,
}

impl EnvValues {
    fn read() -> Result<Self, ConfigError> {
        Ok(Self {
            grafana_url: env_var_or_none("REPORTER_GRAFANA_URL"),
            grafana_username: env_var_or_none("REPORTER_GRAFANA_USERNAME"),
            grafana_password: env_var_or_none("REPORTER_GRAFANA_PASSWORD")
                .map(SecretString::from),
            report_url: env_var_or_none("REPORTER_REPORT_URL"),
            timeout: env_duration("REPORTER_TIMEOUT_SECS")?,
            template: env_var_or_none("REPORTER_TEMPLATE"),
            from: env_var_or_none("REPORTER_FROM"),
            to: env_var_or_none("REPORTER_TO"),
            recipient: env_var_or_none("REPORTER_RECIPIENT"),
            poll_interval: env_duration("REPORTER_POLL_INTERVAL_SECS")?,
            max_wait: env_duration("REPORTER_MAX_WAIT_SECS")?,
            output_dir: env_var_or_none("REPORTER_OUTPUT_DIR").map(PathBuf::from),
        })
    }
}

fn env_duration(key: &str) -> Result<Option<Duration>, ConfigError> {
    env_var_or_none(key)
        .map(|raw| {
            raw.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::invalid_value(key, "must be a whole number of seconds"))
        })
        .transpose()
}

fn validate_positive(key: &str, value: Duration) -> Result<(), ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::invalid_value(key, "must be greater than 0 seconds"));
    }
    Ok(())
}

/// Validate and normalize a base URL: absolute, http(s), with a host;
/// trailing slashes are trimmed.
fn validate_base_url(key: &str, raw: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        key: key.to_string(),
        message: format!("must be an absolute http(s) URL (e.g. http://localhost:3000): {e}"),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidUrl {
            key: key.to_string(),
            message: format!("scheme must be http or https, got: {scheme}"),
        });
    }
    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl {
            key: key.to_string(),
            message: "host is required (e.g. http://localhost:3000)".to_string(),
        });
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
