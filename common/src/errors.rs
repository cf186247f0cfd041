//! Error types shared across the workspace.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while scanning one discovery root.
///
/// Never surfaced to clients: discovery logs it and treats the root as empty.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A root directory (or one of its entries) could not be read.
    #[error("Failed to scan {root}: {source}")]
    ScanFailed {
        /// Root that was being scanned.
        root: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DiscoveryError {
    /// Root directory the error belongs to.
    pub fn root(&self) -> &PathBuf {
        match self {
            Self::ScanFailed { root, .. } => root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_failed_display() {
        let err = DiscoveryError::ScanFailed {
            root: PathBuf::from("public/apps/tsx"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to scan public/apps/tsx: denied");
        assert_eq!(err.root(), &PathBuf::from("public/apps/tsx"));
    }
}
