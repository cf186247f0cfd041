//! Vibe Server - discovers browser apps on disk and serves them over HTTP.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vibe_server::{CliArgs, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = ServerConfig::load(&args)?;

    // RUST_LOG wins over the configured level.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vibe Server v{}", env!("CARGO_PKG_VERSION"));
    if args.config.exists() {
        info!("Config file: {}", args.config.display());
    } else {
        info!("No config file at {}, using defaults", args.config.display());
    }
    info!(
        public_dir = %config.apps.public_dir.display(),
        source_dir = %config.apps.source_dir.display(),
        esbuild = %config.compiler.esbuild_path.display(),
        validator = ?config.compiler.validator,
        timeout_secs = config.compiler.timeout_secs,
        "App layout"
    );

    vibe_api::run_server_with_config(config.to_api_config()).await
}
