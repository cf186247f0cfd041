//! Vibe Server
//!
//! Binary crate wiring the app router together: CLI and config file
//! handling live here, the HTTP surface lives in `vibe-api`.

pub mod config;
pub mod error;

pub use config::{CliArgs, ServerConfig, ValidatorArg, DEFAULT_LOG_FILTER};
pub use error::{ServerError, ServerResult};
