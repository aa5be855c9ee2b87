//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Name the offending key or path in every variant.
//!
//! Does NOT handle:
//! - Exit-code mapping (CLI concern).
//!
//! Invariants:
//! - Dotenv errors NEVER include raw `.env` line contents, so a secret in a
//!   malformed line cannot leak through an error message.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A setting with no usable default was left unset everywhere.
    #[error("missing required setting: {key}")]
    MissingKey { key: String },

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("invalid URL for {key}: {message}")]
    InvalidUrl { key: String, message: String },

    #[error("failed to read config file at {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {message}")]
    FileParse { path: PathBuf, message: String },

    /// The `.env` file has invalid syntax.
    ///
    /// Only the byte index of the failure is reported, never the line.
    #[error(
        "failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    #[error("failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Future dotenvy variants; carries no raw dotenv content.
    #[error("failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}

impl ConfigError {
    pub(crate) fn invalid_value(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Missing-setting constructor for callers that require an optional
    /// setting (e.g. the CLI's `run` command requiring a template).
    pub fn missing_key(key: &str) -> Self {
        Self::MissingKey {
            key: key.to_string(),
        }
    }
}
