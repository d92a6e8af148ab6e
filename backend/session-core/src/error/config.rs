use std::path::PathBuf;

use common::ErrorLocation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Read Error: {path}: {source} {location}")]
    ReadError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `line`/`column` point into the file so a hand edit can be found; both are
    /// zero when the failure is not tied to a position.
    #[error("Config Parse Error: {path}:{line}:{column}: {reason} {location}")]
    ParseError {
        location: ErrorLocation,
        path: PathBuf,
        line: usize,
        column: usize,
        reason: String,
    },

    #[error("Config Write Error: {path}: {source} {location}")]
    WriteError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Serialization Error: {reason} {location}")]
    SerializeError {
        location: ErrorLocation,
        reason: String,
    },

    #[error("Invalid setting {field}: {reason} {location}")]
    InvalidSetting {
        location: ErrorLocation,
        field: &'static str,
        reason: String,
    },
}
