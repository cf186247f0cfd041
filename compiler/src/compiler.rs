//! The TSX compile pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::bundler::{BundleOptions, Bundler, EsbuildBundler};
use crate::config::{CompilerConfig, ValidatorKind};
use crate::document::render_document;
use crate::error::{CompileError, CompileResult};
use crate::postprocess::strip_debug_owner;
use crate::validate::{BundleValidator, NodeCheckValidator, StructuralValidator};

/// Pragma pair prepended to every source to pin the automatic React runtime.
pub const JSX_PRAGMA: &str = "/** @jsxRuntime automatic */\n/** @jsxImportSource react */\n";

/// Name of the scratch entry file inside each compile's temp directory.
const ENTRY_FILE: &str = "entry.tsx";

/// Result of one compile. Lives for a single response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledModule {
    /// App the module was compiled for
    pub app_name: String,
    /// Post-processed bundle text
    pub bundle: String,
    /// HTML document embedding the bundle
    pub document: String,
}

/// Compiles TSX apps on request.
///
/// Holds no per-app state; concurrent compiles of the same app each get
/// their own scratch directory.
pub struct TsxCompiler {
    bundler: Arc<dyn Bundler>,
    validator: Arc<dyn BundleValidator>,
    options: BundleOptions,
}

impl std::fmt::Debug for TsxCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsxCompiler")
            .field("bundler", &self.bundler.name())
            .field("validator", &self.validator.name())
            .field("options", &self.options)
            .finish()
    }
}

impl TsxCompiler {
    /// Compiler with explicit bundler and validator.
    pub fn new(bundler: Arc<dyn Bundler>, validator: Arc<dyn BundleValidator>) -> Self {
        Self {
            bundler,
            validator,
            options: BundleOptions::default(),
        }
    }

    /// esbuild-backed compiler configured from `config`.
    pub fn from_config(config: &CompilerConfig) -> Self {
        let timeout = config.timeout();
        let bundler = Arc::new(EsbuildBundler::new(config.esbuild_path.clone(), timeout));
        let validator: Arc<dyn BundleValidator> = match config.validator {
            ValidatorKind::Structural => Arc::new(StructuralValidator),
            ValidatorKind::NodeCheck => Arc::new(NodeCheckValidator::new(config.node_path.clone(), timeout)),
        };
        Self::new(bundler, validator)
    }

    /// Run the full pipeline for one app.
    pub async fn compile(&self, app_name: &str, source_path: &Path) -> CompileResult<CompiledModule> {
        let started = Instant::now();
        tracing::info!(app = %app_name, source = %source_path.display(), bundler = self.bundler.name(), "Compiling TSX app");

        let source = tokio::fs::read_to_string(source_path)
            .await
            .map_err(|e| CompileError::io("read", source_path, e))?;

        // Dropped at the end of this function, removing the directory.
        let scratch = tempfile::Builder::new()
            .prefix("vibe-tsx-")
            .tempdir()
            .map_err(|e| CompileError::io("create scratch dir in", std::env::temp_dir(), e))?;
        let entry = scratch.path().join(ENTRY_FILE);
        tokio::fs::write(&entry, format!("{JSX_PRAGMA}{source}"))
            .await
            .map_err(|e| CompileError::io("write", &entry, e))?;

        let raw = self.bundler.bundle(&entry, &self.options).await?;
        let bundle = strip_debug_owner(&raw);
        self.validator.validate(&bundle).await?;

        let document = render_document(app_name, &bundle);

        tracing::info!(
            app = %app_name,
            bundle_bytes = bundle.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "TSX app compiled"
        );

        Ok(CompiledModule {
            app_name: app_name.to_string(),
            bundle,
            document,
        })
    }
}
