//! Router state shared by every handler.

use std::sync::Arc;

use common::AppLayout;
use vibe_compiler::TsxCompiler;

use crate::config::ApiConfig;

/// Immutable per-server state: where apps live and how to compile them.
///
/// Holds no registry. Handlers re-scan on every request.
#[derive(Debug, Clone)]
pub struct GalleryState {
    /// Filesystem layout.
    pub layout: Arc<AppLayout>,
    /// Shared TSX compiler.
    pub compiler: Arc<TsxCompiler>,
}

impl GalleryState {
    /// State from explicit parts. Tests use this to plug in a fake bundler.
    pub fn new(layout: AppLayout, compiler: TsxCompiler) -> Self {
        Self {
            layout: Arc::new(layout),
            compiler: Arc::new(compiler),
        }
    }

    /// State for a real server: esbuild-backed compiler from `config.compiler`.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.layout.clone(), TsxCompiler::from_config(&config.compiler))
    }
}
