//! Router configuration and setup.

use axum::{
    http::Uri,
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::ApiConfig,
    error::ApiError,
    middleware,
    routes::{self, apps, assets, gallery, health, registry},
    state::GalleryState,
};

/// Build the full router: routes, docs and middleware, with `state` applied.
pub fn configure_routes(state: GalleryState, config: &ApiConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(|| async { apps::redirect_to_gallery() }))
        .route("/health", get(health::health))
        .route("/api/apps", get(registry::list_apps))
        .route("/apps", get(gallery::gallery))
        .route("/apps/", get(gallery::gallery))
        .route("/apps/{name}", get(apps::serve_app))
        .route("/apps/{name}/{*path}", get(assets::serve_app_asset))
        .route("/beach2/assets/{file}", get(assets::serve_beach2_asset))
        .fallback(not_found);

    if config.enable_swagger {
        router = router.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", routes::ApiDoc::openapi()));
    }

    // Outermost last: CORS, then tracing, then compression, then request context.
    router
        .layer(from_fn(middleware::request_context))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().include_headers(true))
            .on_response(DefaultOnResponse::new().include_headers(true)))
        .layer(middleware::cors_layer(config))
        .with_state(state)
}

async fn not_found(uri: Uri) -> Response {
    ApiError::NotFound(format!("No route for {}", uri.path())).into_response()
}
