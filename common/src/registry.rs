//! Registry snapshot produced by discovery.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The three kinds of app the router knows how to serve.
///
/// Variant order is resolution priority: a folder app shadows an HTML app of
/// the same name, which shadows a TSX app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppKind {
    /// Directory with a built `index.html` and its own assets.
    Folder,
    /// Standalone `.html` file.
    Html,
    /// Single-file React component compiled on request.
    Tsx,
}

impl AppKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Html => "html",
            Self::Tsx => "tsx",
        }
    }
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolved app: its kind and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEntry {
    Folder(PathBuf),
    Html(PathBuf),
    Tsx(PathBuf),
}

impl AppEntry {
    pub fn kind(&self) -> AppKind {
        match self {
            Self::Folder(_) => AppKind::Folder,
            Self::Html(_) => AppKind::Html,
            Self::Tsx(_) => AppKind::Tsx,
        }
    }
}

/// Name → path mapping that keeps scan order.
///
/// Inserting an existing name replaces its path but keeps the position it
/// was first seen at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedPaths {
    entries: Vec<(String, PathBuf)>,
}

impl NamedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. Returns the previous path for `name`, if any.
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Option<PathBuf> {
        let name = name.into();
        let path = path.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, path)),
            None => {
                self.entries.push((name, path));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&PathBuf> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in scan order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p.as_path()))
    }

    /// Same names mapped to the same paths, ignoring order.
    pub fn same_contents(&self, other: &NamedPaths) -> bool {
        self.len() == other.len() && self.iter().all(|(n, p)| other.get(n).map(PathBuf::as_path) == Some(p))
    }
}

/// Snapshot of every app found on disk, one mapping per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppRegistry {
    pub html_apps: NamedPaths,
    pub folder_apps: NamedPaths,
    pub tsx_apps: NamedPaths,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apps(&self, kind: AppKind) -> &NamedPaths {
        match kind {
            AppKind::Folder => &self.folder_apps,
            AppKind::Html => &self.html_apps,
            AppKind::Tsx => &self.tsx_apps,
        }
    }

    /// Highest-priority entry registered under `name`.
    pub fn resolve(&self, name: &str) -> Option<AppEntry> {
        match (
            self.folder_apps.get(name),
            self.html_apps.get(name),
            self.tsx_apps.get(name),
        ) {
            (Some(dir), _, _) => Some(AppEntry::Folder(dir.clone())),
            (None, Some(file), _) => Some(AppEntry::Html(file.clone())),
            (None, None, Some(source)) => Some(AppEntry::Tsx(source.clone())),
            (None, None, None) => None,
        }
    }

    /// Total entries across all kinds. A name present in two kinds counts twice.
    pub fn total(&self) -> usize {
        self.html_apps.len() + self.folder_apps.len() + self.tsx_apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Content equality of the three mappings, ignoring scan order.
    pub fn same_contents(&self, other: &AppRegistry) -> bool {
        self.html_apps.same_contents(&other.html_apps)
            && self.folder_apps.same_contents(&other.folder_apps)
            && self.tsx_apps.same_contents(&other.tsx_apps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut paths = NamedPaths::new();
        assert!(paths.insert("a", "/one/a").is_none());
        paths.insert("b", "/one/b");
        let previous = paths.insert("a", "/two/a");

        assert_eq!(previous, Some(PathBuf::from("/one/a")));
        assert_eq!(paths.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(paths.get("a"), Some(&PathBuf::from("/two/a")));
    }

    #[test]
    fn test_resolve_priority() {
        let mut registry = AppRegistry::new();
        registry.tsx_apps.insert("beach", "/tsx/beach.tsx");
        assert_eq!(registry.resolve("beach").map(|e| e.kind()), Some(AppKind::Tsx));

        registry.html_apps.insert("beach", "/html/beach.html");
        assert_eq!(registry.resolve("beach").map(|e| e.kind()), Some(AppKind::Html));

        registry.folder_apps.insert("beach", "/apps/beach");
        assert_eq!(
            registry.resolve("beach"),
            Some(AppEntry::Folder(PathBuf::from("/apps/beach")))
        );

        assert!(registry.resolve("ocean").is_none());
    }

    #[test]
    fn test_same_contents_ignores_order() {
        let mut left = AppRegistry::new();
        left.html_apps.insert("a", "/a.html");
        left.html_apps.insert("b", "/b.html");

        let mut right = AppRegistry::new();
        right.html_apps.insert("b", "/b.html");
        right.html_apps.insert("a", "/a.html");

        assert!(left.same_contents(&right));
        right.tsx_apps.insert("c", "/c.tsx");
        assert!(!left.same_contents(&right));
        assert_eq!(right.total(), 3);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(AppKind::Folder.to_string(), "folder");
        assert_eq!(serde_json::to_string(&AppKind::Tsx).unwrap(), "\"tsx\"");
    }
}
