//! Configuration system for the Vibe server.
//!
//! Supports:
//! - CLI arguments (highest priority)
//! - Environment variables (through clap's `env`)
//! - TOML config file
//! - Defaults (lowest priority)

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use common::AppLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vibe_api::ApiConfig;
use vibe_compiler::{CompilerConfig, ValidatorKind};

use crate::error::{ServerError, ServerResult};

/// Log filter used when neither `RUST_LOG` nor a level is configured.
pub const DEFAULT_LOG_FILTER: &str =
    "vibe_server=debug,vibe_api=debug,vibe_compiler=debug,common=info,tower_http=debug";

/// Crates a bare `--log-level` applies to.
const LOG_TARGETS: [&str; 5] = ["vibe_server", "vibe_api", "vibe_compiler", "common", "tower_http"];

/// Command-line arguments for the Vibe server.
///
/// Everything except `--config` is optional so that unset flags fall through
/// to the config file and then to the defaults.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "vibe-server")]
#[command(about = "Vibe app router - discovers apps on disk and serves them over HTTP")]
#[command(version)]
pub struct CliArgs {
    /// Interface to bind to
    #[arg(long, env = "VIBE_HOST")]
    pub host: Option<String>,

    /// HTTP port
    #[arg(long, short = 'p', env = "VIBE_PORT")]
    pub port: Option<u16>,

    /// Configuration file path
    #[arg(long, short = 'c', default_value = "vibe.toml", env = "VIBE_CONFIG")]
    pub config: PathBuf,

    /// Built apps root (holds `html/`, `tsx/` and folder apps)
    #[arg(long, env = "VIBE_PUBLIC_DIR")]
    pub public_dir: Option<PathBuf>,

    /// Source apps root, used for folder apps with no built copy
    #[arg(long, env = "VIBE_SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

    /// esbuild executable
    #[arg(long, env = "VIBE_ESBUILD")]
    pub esbuild: Option<PathBuf>,

    /// node executable, used by the node-check validator
    #[arg(long, env = "VIBE_NODE")]
    pub node: Option<PathBuf>,

    /// How compiled bundles are validated
    #[arg(long, value_enum, env = "VIBE_VALIDATOR")]
    pub validator: Option<ValidatorArg>,

    /// Seconds a bundler or validator run may take (0 disables the limit)
    #[arg(long, env = "VIBE_BUNDLE_TIMEOUT")]
    pub bundle_timeout: Option<u64>,

    /// Allowed CORS origins, comma separated (`*` for any)
    #[arg(long, value_delimiter = ',', env = "VIBE_CORS_ORIGINS")]
    pub cors_origins: Option<Vec<String>>,

    /// Disable CORS headers
    #[arg(long, env = "VIBE_NO_CORS")]
    pub no_cors: bool,

    /// Serve Swagger UI and the OpenAPI document
    #[arg(long, env = "VIBE_SWAGGER")]
    pub swagger: Option<bool>,

    /// Log level for this server's crates, or a full filter directive
    #[arg(long, env = "VIBE_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Bundle validator choice on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidatorArg {
    /// Default-export check only
    Structural,
    /// `node --check` on the bundle
    NodeCheck,
}

impl From<ValidatorArg> for ValidatorKind {
    fn from(arg: ValidatorArg) -> Self {
        match arg {
            ValidatorArg::Structural => ValidatorKind::Structural,
            ValidatorArg::NodeCheck => ValidatorKind::NodeCheck,
        }
    }
}

/// Full server configuration (merged from all sources).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP settings
    pub http: HttpConfig,

    /// Where apps live
    pub apps: AppsConfig,

    /// TSX compiler settings
    pub compiler: CompilerConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// `[http]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub enable_swagger: bool,
}

/// `[apps]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppsConfig {
    pub public_dir: PathBuf,
    pub source_dir: PathBuf,
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `debug`, `info`, ... or a full `EnvFilter` directive
    pub level: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let api = ApiConfig::default();
        Self {
            host: api.host,
            port: api.port,
            enable_cors: api.enable_cors,
            cors_origins: api.cors_origins,
            enable_swagger: api.enable_swagger,
        }
    }
}

impl Default for AppsConfig {
    fn default() -> Self {
        let layout = AppLayout::default();
        Self {
            public_dir: layout.public_apps_dir,
            source_dir: layout.source_apps_dir,
        }
    }
}

impl ServerConfig {
    /// Load configuration from CLI args and optional config file.
    ///
    /// Priority: CLI args > Environment > Config file > Defaults. A missing
    /// config file is not an error.
    pub fn load(args: &CliArgs) -> Result<Self> {
        let mut config = if args.config.exists() {
            Self::from_file(&args.config)
                .with_context(|| format!("Failed to load config from {}", args.config.display()))?
        } else {
            Self::default()
        };

        config.apply_cli(args);
        config.validate().context("Configuration rejected")?;
        Ok(config)
    }

    /// Load configuration from a TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ServerError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ServerError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override with whatever was given on the command line.
    pub fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(host) = &args.host {
            self.http.host = host.clone();
        }
        if let Some(port) = args.port {
            self.http.port = port;
        }
        if let Some(origins) = &args.cors_origins {
            self.http.cors_origins = origins.clone();
        }
        if args.no_cors {
            self.http.enable_cors = false;
        }
        if let Some(swagger) = args.swagger {
            self.http.enable_swagger = swagger;
        }
        if let Some(dir) = &args.public_dir {
            self.apps.public_dir = dir.clone();
        }
        if let Some(dir) = &args.source_dir {
            self.apps.source_dir = dir.clone();
        }
        if let Some(path) = &args.esbuild {
            self.compiler.esbuild_path = path.clone();
        }
        if let Some(path) = &args.node {
            self.compiler.node_path = path.clone();
        }
        if let Some(validator) = args.validator {
            self.compiler.validator = validator.into();
        }
        if let Some(secs) = args.bundle_timeout {
            self.compiler.timeout_secs = secs;
        }
        if let Some(level) = &args.log_level {
            self.logging.level = Some(level.clone());
        }
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> ServerResult<()> {
        if self.http.host.trim().is_empty() {
            return Err(ServerError::InvalidConfig("http.host must not be empty".to_string()));
        }
        if self.apps.public_dir == self.apps.source_dir {
            return Err(ServerError::InvalidConfig(format!(
                "apps.public_dir and apps.source_dir are both {}",
                self.apps.public_dir.display()
            )));
        }
        if self.http.enable_cors && self.http.cors_origins.is_empty() {
            return Err(ServerError::InvalidConfig(
                "http.cors_origins is empty while CORS is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// `EnvFilter` directive for the configured level.
    ///
    /// A bare level (`info`) applies to this server's crates; anything with
    /// `=` or `,` is taken as a full directive.
    pub fn log_filter(&self) -> String {
        match self.logging.level.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_LOG_FILTER.to_string(),
            Some(level) if level.contains('=') || level.contains(',') => level.to_string(),
            Some(level) => LOG_TARGETS
                .iter()
                .map(|target| format!("{target}={level}"))
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Layout the router scans.
    pub fn layout(&self) -> AppLayout {
        AppLayout {
            public_apps_dir: self.apps.public_dir.clone(),
            source_apps_dir: self.apps.source_dir.clone(),
        }
    }

    /// Settings for `vibe_api::run_server_with_config`.
    pub fn to_api_config(&self) -> ApiConfig {
        ApiConfig {
            host: self.http.host.clone(),
            port: self.http.port,
            enable_cors: self.http.enable_cors,
            cors_origins: self.http.cors_origins.clone(),
            enable_swagger: self.http.enable_swagger,
            layout: self.layout(),
            compiler: self.compiler.clone(),
        }
    }
}
