//! Static assets under `public/apps`.
//!
//! Paths are validated here, then the file itself is streamed by
//! `tower_http::services::ServeFile`, which also answers `Range` and
//! conditional requests.

use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::{
    body::Body,
    extract::{Path as UrlPath, Request, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use common::{mime::content_type_for, AppLayout};
use tower_http::services::ServeFile;

use crate::error::{ApiError, ApiResult};
use crate::state::GalleryState;

/// Folder that legacy assets are served from under `public/apps`.
const BEACH2_APP: &str = "beach2";

/// Subdirectory whose files fall back to the source tree when not built.
const ASSETS_DIR: &str = "assets";

/// `GET /apps/{name}/{*path}`
///
/// Serves `public/apps/{name}/{path}`. Requests under `assets/` fall back to
/// `apps/{name}/assets/...` when the built file is missing.
pub async fn serve_app_asset(
    State(state): State<GalleryState>,
    UrlPath((name, path)): UrlPath<(String, String)>,
    request: Request,
) -> ApiResult<Response> {
    let relative = safe_relative(&format!("{name}/{path}"))
        .ok_or_else(|| not_found(&name, &path))?;
    if !has_extension(&relative) {
        return Err(not_found(&name, &path));
    }

    let layout = &state.layout;
    let built = layout.public_apps_dir.join(&relative);
    if is_file(&built).await {
        return serve_file(&built, request).await;
    }

    if relative.iter().nth(1).is_some_and(|segment| segment == ASSETS_DIR) {
        let source = layout.source_apps_dir.join(&relative);
        if is_file(&source).await {
            tracing::debug!(app = %name, path = %source.display(), "Serving asset from source tree");
            return serve_file(&source, request).await;
        }
    }

    Err(not_found(&name, &path))
}

/// `GET /beach2/assets/{file}`
pub async fn serve_beach2_asset(
    State(state): State<GalleryState>,
    UrlPath(file): UrlPath<String>,
    request: Request,
) -> ApiResult<Response> {
    let relative = safe_relative(&format!("{BEACH2_APP}/{ASSETS_DIR}/{file}"))
        .ok_or_else(|| not_found(BEACH2_APP, &file))?;
    let path = state.layout.public_apps_dir.join(relative);
    if !is_file(&path).await {
        return Err(not_found(BEACH2_APP, &file));
    }
    serve_file(&path, request).await
}

/// A top-level file such as `public/apps/favicon.ico`, reached when
/// `/apps/{name}` looks like an asset.
pub async fn serve_top_level(layout: &AppLayout, name: &str, request: Request) -> ApiResult<Response> {
    let relative = safe_relative(name).ok_or_else(|| ApiError::NotFound(format!("File '{}' not found", name)))?;
    let path = layout.public_apps_dir.join(relative);
    if !is_file(&path).await {
        return Err(ApiError::NotFound(format!("File '{}' not found", name)));
    }
    serve_file(&path, request).await
}

/// Stream `path` in answer to `request`. A missing file is a 404 problem
/// response. `Content-Type` always comes from the local table.
pub(crate) async fn serve_file(path: &Path, request: Request) -> ApiResult<Response> {
    if !is_file(path).await {
        return Err(ApiError::NotFound(format!("File '{}' not found", path.display())));
    }

    let response = ServeFile::new(path)
        .try_call(request)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let content_type = content_type_for(path);
    let mut response = response.map(Body::new);
    if response.status().is_success() {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    tracing::debug!(path = %path.display(), content_type, status = %response.status(), "Serving file");
    Ok(response.into_response())
}

/// Relative path made only of plain segments. Rejects `..`, `.`, empty
/// segments and backslashes so the result can never leave the root it is
/// joined onto.
fn safe_relative(path: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for segment in path.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
            return None;
        }
        out.push(segment);
    }
    Some(out)
}

fn has_extension(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains('.'))
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}

fn not_found(name: &str, path: &str) -> ApiError {
    ApiError::NotFound(format!("Asset '{}' not found for app '{}'", path, name))
}
