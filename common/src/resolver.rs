//! Route resolution for `/apps/{name}`.

use std::path::PathBuf;

use crate::layout::{AppLayout, INDEX_FILE};
use crate::registry::{AppEntry, AppKind, AppRegistry};

/// What `/apps/{name}` should answer with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Name looks like an asset path (`.` or `/`); an asset route answers.
    Defer,
    /// Send this file as `text/html`.
    Serve { kind: AppKind, path: PathBuf },
    /// Compile this TSX source and send the resulting document.
    Compile(PathBuf),
    /// Unknown app: redirect to the gallery.
    Redirect,
}

/// True for names that address a file inside an app rather than an app.
pub fn is_asset_like(name: &str) -> bool {
    name.contains('.') || name.contains('/')
}

/// Decide how to answer `/apps/{name}`.
///
/// Priority is folder > html > tsx > redirect, taken from
/// [`AppRegistry::resolve`]. For folder apps the built
/// `public/apps/{name}/index.html` wins over whatever path the registry holds.
pub async fn resolve_request(layout: &AppLayout, registry: &AppRegistry, name: &str) -> Resolution {
    if is_asset_like(name) {
        tracing::debug!(app = %name, "Name looks like an asset, deferring");
        return Resolution::Defer;
    }

    let resolution = match registry.resolve(name) {
        Some(AppEntry::Folder(dir)) => {
            let built = layout.built_index(name);
            let path = if exists(&built).await {
                built
            } else {
                tracing::debug!(
                    app = %name,
                    dir = %dir.display(),
                    source_tree = layout.is_source_path(&dir),
                    "No built index, serving registered folder"
                );
                dir.join(INDEX_FILE)
            };
            Resolution::Serve { kind: AppKind::Folder, path }
        }
        Some(AppEntry::Html(file)) => Resolution::Serve { kind: AppKind::Html, path: file },
        Some(AppEntry::Tsx(source)) => Resolution::Compile(source),
        None => Resolution::Redirect,
    };

    match &resolution {
        Resolution::Serve { kind, path } => {
            tracing::info!(app = %name, kind = %kind, path = %path.display(), "Resolved app");
        }
        Resolution::Compile(path) => {
            tracing::info!(app = %name, kind = %AppKind::Tsx, path = %path.display(), "Resolved app");
        }
        Resolution::Redirect => {
            tracing::info!(app = %name, "Unknown app, redirecting to gallery");
        }
        Resolution::Defer => {}
    }

    resolution
}

async fn exists(path: &std::path::Path) -> bool {
    tokio::fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_asset_like_names_defer() {
        let layout = AppLayout::default();
        let registry = AppRegistry::new();
        assert_eq!(resolve_request(&layout, &registry, "favicon.ico").await, Resolution::Defer);
        assert_eq!(resolve_request(&layout, &registry, "beach/main").await, Resolution::Defer);
    }

    #[tokio::test]
    async fn test_unknown_redirects() {
        let layout = AppLayout::default();
        let registry = AppRegistry::new();
        assert_eq!(resolve_request(&layout, &registry, "nope").await, Resolution::Redirect);
    }

    #[tokio::test]
    async fn test_folder_prefers_built_index() {
        let dir = tempfile::tempdir().unwrap();
        let layout = AppLayout::rooted_at(dir.path());
        let built = layout.built_index("admin");
        fs::create_dir_all(built.parent().unwrap()).unwrap();
        fs::write(&built, "built").unwrap();

        // Registry points at the source tree, but the built index exists.
        let mut registry = AppRegistry::new();
        registry.folder_apps.insert("admin", layout.source_apps_dir.join("admin"));

        let resolution = resolve_request(&layout, &registry, "admin").await;
        assert_eq!(resolution, Resolution::Serve { kind: AppKind::Folder, path: built });
    }

    #[tokio::test]
    async fn test_folder_falls_back_to_source_index() {
        let dir = tempfile::tempdir().unwrap();
        let layout = AppLayout::rooted_at(dir.path());
        let source = layout.source_apps_dir.join("vibesynq");

        let mut registry = AppRegistry::new();
        registry.folder_apps.insert("vibesynq", source.clone());
        registry.html_apps.insert("vibesynq", layout.html_dir().join("vibesynq.html"));

        let resolution = resolve_request(&layout, &registry, "vibesynq").await;
        assert_eq!(
            resolution,
            Resolution::Serve { kind: AppKind::Folder, path: source.join(INDEX_FILE) }
        );
    }

    #[tokio::test]
    async fn test_folder_outside_source_root_serves_registered_index() {
        let dir = tempfile::tempdir().unwrap();
        let layout = AppLayout::rooted_at(dir.path());
        let elsewhere = dir.path().join("elsewhere").join("harbor");
        fs::create_dir_all(&elsewhere).unwrap();
        assert!(!layout.is_source_path(&elsewhere));

        let mut registry = AppRegistry::new();
        registry.folder_apps.insert("harbor", elsewhere.clone());

        assert_eq!(
            resolve_request(&layout, &registry, "harbor").await,
            Resolution::Serve { kind: AppKind::Folder, path: elsewhere.join(INDEX_FILE) }
        );
    }

    #[tokio::test]
    async fn test_html_before_tsx() {
        let layout = AppLayout::default();
        let mut registry = AppRegistry::new();
        registry.tsx_apps.insert("calc", "/tsx/calc.tsx");
        registry.html_apps.insert("calc", "/html/calc.html");
        registry.tsx_apps.insert("clock", "/tsx/clock.tsx");

        assert_eq!(
            resolve_request(&layout, &registry, "calc").await,
            Resolution::Serve { kind: AppKind::Html, path: PathBuf::from("/html/calc.html") }
        );
        assert_eq!(
            resolve_request(&layout, &registry, "clock").await,
            Resolution::Compile(PathBuf::from("/tsx/clock.tsx"))
        );
    }
}
