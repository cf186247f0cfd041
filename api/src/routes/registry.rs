//! `GET /api/apps`: the registry as JSON.

use axum::{extract::State, Json};
use common::{app_url, discover_apps, AppKind, AppRegistry};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::GalleryState;

/// One discovered app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AppSummary {
    /// App name, as used in `/apps/{name}`
    pub name: String,
    /// `tsx`, `folder` or `html`
    pub kind: String,
    /// Link to the app
    pub url: String,
}

/// Registry snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AppListResponse {
    /// Number of entries across all kinds
    pub total: usize,
    /// Entries grouped by kind (tsx, folder, html), scan order within a kind
    pub apps: Vec<AppSummary>,
}

impl From<&AppRegistry> for AppListResponse {
    fn from(registry: &AppRegistry) -> Self {
        let apps: Vec<AppSummary> = [AppKind::Tsx, AppKind::Folder, AppKind::Html]
            .into_iter()
            .flat_map(|kind| {
                registry.apps(kind).names().map(move |name| AppSummary {
                    name: name.to_string(),
                    kind: kind.to_string(),
                    url: app_url(name),
                })
            })
            .collect();

        Self { total: apps.len(), apps }
    }
}

/// List every app discovery finds right now.
#[utoipa::path(
    get,
    path = "/api/apps",
    tag = "Apps",
    responses(
        (status = 200, description = "Current registry snapshot", body = AppListResponse)
    )
)]
pub async fn list_apps(State(state): State<GalleryState>) -> Json<AppListResponse> {
    let registry = discover_apps(&state.layout).await;
    let response = AppListResponse::from(&registry);
    tracing::debug!(total = response.total, "Listing apps");
    Json(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_order_and_urls() {
        let mut registry = AppRegistry::new();
        registry.html_apps.insert("snake", "/html/snake.html");
        registry.folder_apps.insert("beach", "/public/apps/beach");
        registry.tsx_apps.insert("clock", "/tsx/clock.tsx");

        let response = AppListResponse::from(&registry);
        assert_eq!(response.total, 3);
        let kinds: Vec<_> = response.apps.iter().map(|a| a.kind.as_str()).collect();
        assert_eq!(kinds, vec!["tsx", "folder", "html"]);
        assert_eq!(response.apps[0].url, "/apps/clock");
    }

    #[test]
    fn test_urls_percent_encode_names() {
        let mut registry = AppRegistry::new();
        registry.html_apps.insert("c# notes", "/html/c# notes.html");

        let response = AppListResponse::from(&registry);
        assert_eq!(response.apps[0].name, "c# notes");
        assert_eq!(response.apps[0].url, "/apps/c%23%20notes");
    }
}
