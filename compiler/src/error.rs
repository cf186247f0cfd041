//! Compilation errors.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for compiler operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// Anything that can go wrong between reading a `.tsx` file and producing
/// its document. All variants end up on the 500 error page.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Reading the source or writing a scratch file failed.
    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        /// What was being attempted ("read", "write", ...)
        action: &'static str,
        /// File involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// An external tool (bundler or runtime) could not be started.
    #[error("Tool `{program}` is not available: {source}")]
    ToolUnavailable {
        /// Program that failed to spawn
        program: String,
        /// Spawn error
        #[source]
        source: std::io::Error,
    },

    /// The bundler ran and reported errors.
    #[error("Bundle failed: {0}")]
    BundleFailed(String),

    /// An external tool exceeded its time budget.
    #[error("`{program}` timed out after {}s", timeout.as_secs())]
    Timeout {
        /// Program that was killed
        program: String,
        /// Budget it exceeded
        timeout: Duration,
    },

    /// The bundle was produced but does not load.
    #[error("Bundle validation failed: {0}")]
    Invalid(String),
}

impl CompileError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CompileError::BundleFailed("Unexpected \"}\"".to_string());
        assert_eq!(err.to_string(), "Bundle failed: Unexpected \"}\"");

        let err = CompileError::Timeout {
            program: "esbuild".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "`esbuild` timed out after 30s");
    }

    #[test]
    fn test_io_error_names_path() {
        let err = CompileError::io(
            "read",
            "public/apps/tsx/missing.tsx",
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to read public/apps/tsx/missing.tsx: No such file"
        );
    }
}
