//! Configuration for the grafana-reporter binaries.
//!
//! Loads settings for the metadata service, the render service, and the run
//! defaults from layered sources: explicit overrides, `REPORTER_*`
//! environment variables, an optional YAML file, and built-in defaults.

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{ConfigLoader, env_var_or_none};
pub use types::{Config, GrafanaSettings, ReportServiceSettings, RunSettings};
