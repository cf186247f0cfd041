//! Bundle validation: does the bundle load?
//!
//! The compiled module is executed in the browser, not here. Validation only
//! catches bundles that would fail before the component renders.

use async_trait::async_trait;
use regex::Regex;
use std::io::Write;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{CompileError, CompileResult};
use crate::process::{failure_message, run_tool};

/// Checks a bundle before it is shipped to the browser.
#[async_trait]
pub trait BundleValidator: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// `Ok(())` if the bundle is fit to embed.
    async fn validate(&self, bundle: &str) -> CompileResult<()>;
}

static DEFAULT_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^|[;\s])export\s+default\b|\bas\s+default\b").expect("static regex is valid")
});

/// Static check: non-empty and has a default export to mount.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

#[async_trait]
impl BundleValidator for StructuralValidator {
    fn name(&self) -> &str {
        "structural"
    }

    async fn validate(&self, bundle: &str) -> CompileResult<()> {
        if bundle.trim().is_empty() {
            return Err(CompileError::Invalid("bundle is empty".to_string()));
        }
        if !DEFAULT_EXPORT.is_match(bundle) {
            return Err(CompileError::Invalid(
                "bundle has no default export to mount".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parses the bundle as an ES module with `node --check`.
///
/// Each call writes to its own uniquely-named `.mjs` temp file, so concurrent
/// validations never collide. The file is removed afterwards.
#[derive(Debug, Clone)]
pub struct NodeCheckValidator {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl NodeCheckValidator {
    /// Validator invoking the `node` binary at `program`.
    pub fn new(program: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl Default for NodeCheckValidator {
    fn default() -> Self {
        Self::new("node", Some(Duration::from_secs(30)))
    }
}

#[async_trait]
impl BundleValidator for NodeCheckValidator {
    fn name(&self) -> &str {
        "node-check"
    }

    async fn validate(&self, bundle: &str) -> CompileResult<()> {
        StructuralValidator.validate(bundle).await?;

        let mut file = tempfile::Builder::new()
            .prefix("vibe-bundle-")
            .suffix(".mjs")
            .tempfile()
            .map_err(|e| CompileError::io("create", std::env::temp_dir(), e))?;
        file.write_all(bundle.as_bytes())
            .map_err(|e| CompileError::io("write", file.path(), e))?;

        let path = file.path().to_path_buf();
        let output = run_tool(&self.program, [std::ffi::OsStr::new("--check"), path.as_os_str()], self.timeout).await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(CompileError::Invalid(failure_message(&output)))
        }
    }
}
