//! HTTP route handlers.

pub mod apps;
pub mod assets;
pub mod gallery;
pub mod health;
pub mod registry;

use utoipa::OpenApi;

/// OpenAPI documentation for the JSON routes.
///
/// The HTML routes (`/apps`, `/apps/{name}`, assets) are not described here.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vibe Apps API",
        version = "0.1.0",
        description = "App discovery and serving for Vibe apps",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development")
    ),
    paths(health::health, registry::list_apps),
    components(schemas(
        health::HealthResponse,
        registry::AppListResponse,
        registry::AppSummary,
    )),
    tags(
        (name = "System", description = "Service health"),
        (name = "Apps", description = "Discovered apps")
    )
)]
pub struct ApiDoc;
