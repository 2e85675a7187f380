//! Errors raised at the edges of the system: configuration and shell input.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid or unreadable robot settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value {value:?} for {var}")]
    Env { var: &'static str, value: String },
    #[error("success_probability must be within [0, 1], got {0}")]
    Probability(f64),
    #[error("anomaly_low ({low}) must not exceed anomaly_high ({high})")]
    Bounds { low: f64, high: f64 },
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
}

/// Rejected shell input; never reaches the controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}
