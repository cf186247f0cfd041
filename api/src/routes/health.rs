//! Health check endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Version
    pub version: String,
}

/// Basic service health, no authentication required.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    let response = HealthResponse {
        status: "ok".to_string(),
        service: "vibe-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    tracing::debug!(status = %response.status, "Health check");

    Json(response)
}
