//! Bundler seam and the esbuild implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CompileError, CompileResult};
use crate::process::{failure_message, run_tool};

/// Build settings handed to a [`Bundler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    /// Bare specifiers left as imports; the document's import map provides them.
    pub externals: Vec<String>,
    /// Compile-time replacements, `(identifier, JS expression)`.
    pub defines: Vec<(String, String)>,
    /// Minify output.
    pub minify: bool,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            externals: vec![
                "react".to_string(),
                "react-dom".to_string(),
                "react/jsx-runtime".to_string(),
                "react/jsx-dev-runtime".to_string(),
            ],
            defines: vec![("process.env.NODE_ENV".to_string(), "\"production\"".to_string())],
            minify: false,
        }
    }
}

/// Turns an entry file into one browser ESM bundle.
///
/// Implementations work on file paths, not in-memory source; the compiler
/// writes a scratch entry file first.
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Bundle `entry` and return the JavaScript text.
    async fn bundle(&self, entry: &Path, options: &BundleOptions) -> CompileResult<String>;
}

/// Runs the `esbuild` CLI as a subprocess and reads the bundle from stdout.
#[derive(Debug, Clone)]
pub struct EsbuildBundler {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl EsbuildBundler {
    /// Bundler invoking `program` with an optional time budget per build.
    pub fn new(program: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Command-line arguments for one build.
    pub fn args(entry: &Path, options: &BundleOptions) -> Vec<String> {
        let mut args = vec![
            entry.display().to_string(),
            "--bundle".to_string(),
            "--format=esm".to_string(),
            "--platform=browser".to_string(),
            "--jsx=automatic".to_string(),
            format!("--minify={}", options.minify),
            "--log-level=error".to_string(),
            "--charset=utf8".to_string(),
        ];
        args.extend(options.externals.iter().map(|e| format!("--external:{e}")));
        args.extend(options.defines.iter().map(|(k, v)| format!("--define:{k}={v}")));
        args
    }
}

impl Default for EsbuildBundler {
    fn default() -> Self {
        Self::new("esbuild", Some(Duration::from_secs(60)))
    }
}

#[async_trait]
impl Bundler for EsbuildBundler {
    fn name(&self) -> &str {
        "esbuild"
    }

    async fn bundle(&self, entry: &Path, options: &BundleOptions) -> CompileResult<String> {
        let output = run_tool(&self.program, Self::args(entry, options), self.timeout).await?;

        if !output.status.success() {
            return Err(CompileError::BundleFailed(failure_message(&output)));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| CompileError::BundleFailed(format!("bundle is not valid UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_esbuild_args() {
        let args = EsbuildBundler::args(Path::new("/tmp/entry.tsx"), &BundleOptions::default());
        assert_eq!(args[0], "/tmp/entry.tsx");
        assert!(args.contains(&"--bundle".to_string()));
        assert!(args.contains(&"--format=esm".to_string()));
        assert!(args.contains(&"--platform=browser".to_string()));
        assert!(args.contains(&"--minify=false".to_string()));
        assert!(args.contains(&"--external:react".to_string()));
        assert!(args.contains(&"--external:react-dom".to_string()));
        assert!(args.contains(&"--define:process.env.NODE_ENV=\"production\"".to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_build_surfaces_stderr() {
        // `false` ignores its arguments and exits 1 with no output.
        let bundler = EsbuildBundler::new("false", None);
        let err = bundler
            .bundle(Path::new("entry.tsx"), &BundleOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CompileError::BundleFailed(_)));
    }
}
