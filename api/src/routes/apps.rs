//! `GET /apps/{name}`: serve, compile, or redirect.

use std::path::Path;

use axum::{
    extract::{Path as UrlPath, Request, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension,
};
use common::{discover_apps, resolve_request, RequestContext, Resolution};
use vibe_compiler::render_error_page;

use crate::error::ApiResult;
use crate::routes::assets;
use crate::state::GalleryState;

/// Where unknown apps are sent.
pub const GALLERY_PATH: &str = "/apps";

/// Resolve `name` against a fresh registry and answer accordingly.
pub async fn serve_app(
    State(state): State<GalleryState>,
    UrlPath(name): UrlPath<String>,
    Extension(ctx): Extension<RequestContext>,
    request: Request,
) -> ApiResult<Response> {
    let registry = discover_apps(&state.layout).await;

    match resolve_request(&state.layout, &registry, &name).await {
        Resolution::Defer => assets::serve_top_level(&state.layout, &name, request).await,
        Resolution::Serve { path, .. } => assets::serve_file(&path, request).await,
        Resolution::Compile(source) => Ok(compile_app(&state, &ctx, &name, &source).await),
        Resolution::Redirect => Ok(redirect_to_gallery()),
    }
}

/// `302 Found` to the gallery.
pub fn redirect_to_gallery() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, GALLERY_PATH)]).into_response()
}

/// Compile and answer with the document, or with the error page on failure.
async fn compile_app(state: &GalleryState, ctx: &RequestContext, name: &str, source: &Path) -> Response {
    match state.compiler.compile(name, source).await {
        Ok(module) => {
            tracing::info!(
                request_id = %ctx.request_id,
                app = %name,
                bytes = module.document.len(),
                "Serving compiled app"
            );
            Html(module.document).into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %ctx.request_id,
                app = %name,
                error = %e,
                "Compilation failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_error_page(name, &e.to_string())),
            )
                .into_response()
        }
    }
}
