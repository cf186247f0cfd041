//! Error types for the Vibe server.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    ReadConfig {
        /// File that was read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::ServerConfig`]
    #[error("Failed to parse config file {path}: {source}")]
    ParseConfig {
        /// File that was parsed
        path: PathBuf,
        /// Parser error, with line and column
        #[source]
        source: toml::de::Error,
    },

    /// Merged configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
