//! Vibe API Crate
//!
//! HTTP layer for the Vibe app router using Axum.
//!
//! # Routes
//!
//! - `GET /apps` gallery of every discovered app
//! - `GET /apps/{name}` folder index, HTML file, compiled TSX, or a redirect
//!   back to the gallery
//! - `GET /apps/{name}/{*path}` static assets
//! - `GET /health`, `GET /api/apps` JSON endpoints, documented via OpenAPI
//!
//! Discovery runs on every request; nothing is cached between requests.
//!
//! # Usage
//!
//! ```rust,no_run
//! use vibe_api::ApiConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     vibe_api::run_server_with_config(ApiConfig::default()).await
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod config;
mod error;
mod middleware;
mod router;
pub mod routes;
mod state;

// Re-export public API
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use middleware::REQUEST_ID_HEADER;
pub use routes::gallery::{render_gallery, GalleryContext};
pub use state::GalleryState;

use std::net::SocketAddr;

use axum::Router;
use common::discover_apps;

/// Build the router for `state`. Used by the server and by tests.
pub fn build_router(state: GalleryState, config: &ApiConfig) -> Router {
    router::configure_routes(state, config)
}

/// Run the HTTP server until Ctrl+C (or SIGTERM on Unix).
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run_server_with_config(config: ApiConfig) -> anyhow::Result<()> {
    run_server(GalleryState::from_config(&config), config).await
}

/// Run the HTTP server with an explicit state.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run_server(state: GalleryState, config: ApiConfig) -> anyhow::Result<()> {
    use anyhow::Context;

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let local = listener.local_addr()?;

    let registry = discover_apps(&state.layout).await;
    tracing::info!(
        tsx = registry.tsx_apps.len(),
        folder = registry.folder_apps.len(),
        html = registry.html_apps.len(),
        public_dir = %state.layout.public_apps_dir.display(),
        source_dir = %state.layout.source_apps_dir.display(),
        "Discovered apps"
    );
    tracing::debug!(compiler = ?state.compiler, "Compiler ready");

    tracing::info!("Vibe app router listening on http://{}", local);
    tracing::info!("Gallery:       http://{}/apps", local);
    if config.enable_swagger {
        tracing::info!("Swagger UI:    http://{}/swagger-ui/", local);
        tracing::info!("OpenAPI Spec:  http://{}/api-doc/openapi.json", local);
    }

    let app = build_router(state, &config);
    let service = app.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
