//! App discovery: filesystem scan → immutable [`AppRegistry`] snapshot.
//!
//! Three roots are scanned:
//! - `public/apps/html/*.html` (HTML apps)
//! - `public/apps/tsx/*.tsx` (TSX apps)
//! - `{public/apps/*, apps/*}/index.html` (folder apps, built root first)
//!
//! A root that fails to scan contributes zero entries; the others still run.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::DiscoveryError;
use crate::layout::{AppLayout, HTML_SUBDIR, INDEX_FILE, TSX_SUBDIR};
use crate::registry::{AppKind, AppRegistry};

/// Scan the layout and build a fresh registry.
///
/// Folder apps under the source root are only added when the built root has
/// no app of the same name.
pub async fn discover_apps(layout: &AppLayout) -> AppRegistry {
    let mut registry = AppRegistry::new();

    let html_dir = layout.html_dir();
    for (name, path) in recover(AppKind::Html, &html_dir, files_with_extension(&html_dir, "html").await) {
        registry.html_apps.insert(name, path);
    }

    let tsx_dir = layout.tsx_dir();
    for (name, path) in recover(AppKind::Tsx, &tsx_dir, files_with_extension(&tsx_dir, "tsx").await) {
        registry.tsx_apps.insert(name, path);
    }

    let built = folder_apps_in(&layout.public_apps_dir, &[HTML_SUBDIR, TSX_SUBDIR]).await;
    for (name, dir) in recover(AppKind::Folder, &layout.public_apps_dir, built) {
        registry.folder_apps.insert(name, dir);
    }

    let sources = folder_apps_in(&layout.source_apps_dir, &[]).await;
    for (name, dir) in recover(AppKind::Folder, &layout.source_apps_dir, sources) {
        if registry.folder_apps.contains(&name) {
            tracing::debug!(app = %name, source = %dir.display(), "Built app shadows source app");
            continue;
        }
        registry.folder_apps.insert(name, dir);
    }

    tracing::debug!(
        html = registry.html_apps.len(),
        folder = registry.folder_apps.len(),
        tsx = registry.tsx_apps.len(),
        "App discovery complete"
    );

    registry
}

/// Log a failed root and carry on with nothing from it.
fn recover(
    kind: AppKind,
    root: &Path,
    result: Result<Vec<(String, PathBuf)>, DiscoveryError>,
) -> Vec<(String, PathBuf)> {
    match result {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(kind = %kind, root = %root.display(), error = %e, "App scan failed, skipping root");
            Vec::new()
        }
    }
}

/// Read a directory. A missing directory is an empty scan, not an error.
async fn list_dir(root: &Path) -> Result<Vec<(String, PathBuf)>, DiscoveryError> {
    let scan_failed = |source| DiscoveryError::ScanFailed {
        root: root.to_path_buf(),
        source,
    };

    let mut reader = match tokio::fs::read_dir(root).await {
        Ok(reader) => reader,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(root = %root.display(), "Discovery root does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(scan_failed(e)),
    };

    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await.map_err(scan_failed)? {
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            tracing::debug!(path = %entry.path().display(), "Skipping non UTF-8 entry");
            continue;
        };
        if file_name.starts_with('.') {
            continue;
        }
        entries.push((file_name.to_string(), entry.path()));
    }
    Ok(entries)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}

/// Regular files named `<stem>.<extension>`, keyed by stem.
async fn files_with_extension(
    root: &Path,
    extension: &str,
) -> Result<Vec<(String, PathBuf)>, DiscoveryError> {
    let mut found = Vec::new();
    for (file_name, path) in list_dir(root).await? {
        let Some(stem) = file_name
            .strip_suffix(extension)
            .and_then(|s| s.strip_suffix('.'))
        else {
            continue;
        };
        if stem.is_empty() || !is_file(&path).await {
            continue;
        }
        found.push((stem.to_string(), path));
    }
    Ok(found)
}

/// Subdirectories of `root` that contain an `index.html`, keyed by directory name.
async fn folder_apps_in(
    root: &Path,
    excluded: &[&str],
) -> Result<Vec<(String, PathBuf)>, DiscoveryError> {
    let mut found = Vec::new();
    for (dir_name, path) in list_dir(root).await? {
        if excluded.contains(&dir_name.as_str()) || !is_dir(&path).await {
            continue;
        }
        if is_file(&path.join(INDEX_FILE)).await {
            found.push((dir_name, path));
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<html></html>").unwrap();
    }

    #[tokio::test]
    async fn test_empty_layout_discovers_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let registry = discover_apps(&AppLayout::rooted_at(dir.path())).await;
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_extension_must_match_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let layout = AppLayout::rooted_at(dir.path());
        touch(&layout.html_dir().join("ok.html"));
        touch(&layout.html_dir().join("notes.htm"));
        touch(&layout.html_dir().join("archive.html.bak"));
        touch(&layout.html_dir().join(".hidden.html"));
        touch(&layout.tsx_dir().join("widget.tsx"));
        touch(&layout.tsx_dir().join("helper.ts"));

        let registry = discover_apps(&layout).await;
        assert_eq!(registry.html_apps.names().collect::<Vec<_>>(), vec!["ok"]);
        assert_eq!(registry.tsx_apps.names().collect::<Vec<_>>(), vec!["widget"]);
    }

    #[tokio::test]
    async fn test_folder_scan_skips_kind_dirs_and_dirs_without_index() {
        let dir = tempfile::tempdir().unwrap();
        let layout = AppLayout::rooted_at(dir.path());
        touch(&layout.html_dir().join("index.html"));
        touch(&layout.tsx_dir().join("index.html"));
        touch(&layout.public_apps_dir.join("beach").join("index.html"));
        fs::create_dir_all(layout.public_apps_dir.join("empty")).unwrap();

        let registry = discover_apps(&layout).await;
        assert_eq!(registry.folder_apps.names().collect::<Vec<_>>(), vec!["beach"]);
        // `html/index.html` is a regular HTML app named "index"
        assert!(registry.html_apps.contains("index"));
    }

    #[tokio::test]
    async fn test_built_folder_shadows_source() {
        let dir = tempfile::tempdir().unwrap();
        let layout = AppLayout::rooted_at(dir.path());
        touch(&layout.public_apps_dir.join("admin").join("index.html"));
        touch(&layout.source_apps_dir.join("admin").join("index.html"));
        touch(&layout.source_apps_dir.join("vibesynq").join("index.html"));

        let registry = discover_apps(&layout).await;
        assert_eq!(
            registry.folder_apps.get("admin"),
            Some(&layout.public_apps_dir.join("admin"))
        );
        assert_eq!(
            registry.folder_apps.get("vibesynq"),
            Some(&layout.source_apps_dir.join("vibesynq"))
        );
    }

    #[tokio::test]
    async fn test_broken_root_does_not_abort_others() {
        let dir = tempfile::tempdir().unwrap();
        let layout = AppLayout::rooted_at(dir.path());
        touch(&layout.tsx_dir().join("calc.tsx"));
        // A file where the html directory should be makes read_dir fail.
        touch(&layout.html_dir());

        let registry = discover_apps(&layout).await;
        assert!(registry.html_apps.is_empty());
        assert!(registry.tsx_apps.contains("calc"));
    }

    #[tokio::test]
    async fn test_scan_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("plain");
        touch(&not_a_dir);

        let err = list_dir(&not_a_dir).await.unwrap_err();
        assert_eq!(err.root(), &not_a_dir);
    }
}
