//! Filesystem layout the router reads apps from.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Subdirectory of the public root holding standalone `.html` apps.
pub const HTML_SUBDIR: &str = "html";

/// Subdirectory of the public root holding `.tsx` sources.
pub const TSX_SUBDIR: &str = "tsx";

/// Entry document every folder app must ship.
pub const INDEX_FILE: &str = "index.html";

/// Where apps live on disk.
///
/// `public_apps_dir` holds built artifacts and always wins over
/// `source_apps_dir`, which is only consulted for folder apps with no built
/// counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppLayout {
    /// Built root, `public/apps` by default.
    pub public_apps_dir: PathBuf,
    /// Fallback source root, `apps` by default.
    pub source_apps_dir: PathBuf,
}

impl Default for AppLayout {
    fn default() -> Self {
        Self {
            public_apps_dir: PathBuf::from("public/apps"),
            source_apps_dir: PathBuf::from("apps"),
        }
    }
}

impl AppLayout {
    /// Layout rooted at `base`, using the default relative directories.
    pub fn rooted_at(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            public_apps_dir: base.join("public").join("apps"),
            source_apps_dir: base.join("apps"),
        }
    }

    pub fn html_dir(&self) -> PathBuf {
        self.public_apps_dir.join(HTML_SUBDIR)
    }

    pub fn tsx_dir(&self) -> PathBuf {
        self.public_apps_dir.join(TSX_SUBDIR)
    }

    /// `public/apps/{name}/index.html`, whether or not it exists.
    pub fn built_index(&self, name: &str) -> PathBuf {
        self.public_apps_dir.join(name).join(INDEX_FILE)
    }

    /// True if `path` lives under the fallback source root.
    pub fn is_source_path(&self, path: &Path) -> bool {
        path.starts_with(&self.source_apps_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = AppLayout::default();
        assert_eq!(layout.html_dir(), PathBuf::from("public/apps/html"));
        assert_eq!(layout.tsx_dir(), PathBuf::from("public/apps/tsx"));
        assert_eq!(
            layout.built_index("beach"),
            PathBuf::from("public/apps/beach/index.html")
        );
    }

    #[test]
    fn test_source_path_detection() {
        let layout = AppLayout::rooted_at("/srv");
        assert!(layout.is_source_path(Path::new("/srv/apps/admin")));
        assert!(!layout.is_source_path(Path::new("/srv/public/apps/admin")));
    }
}
