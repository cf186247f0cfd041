//! Compiler configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Which [`crate::BundleValidator`] the compiler uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidatorKind {
    /// Static default-export check, no external tools.
    #[default]
    Structural,
    /// Parse the bundle with `node --check`.
    NodeCheck,
}

/// Settings for [`crate::TsxCompiler::from_config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Path to the `esbuild` executable.
    ///
    /// Default: `esbuild` (looked up on `PATH`)
    pub esbuild_path: PathBuf,

    /// Path to `node`, used by [`ValidatorKind::NodeCheck`].
    ///
    /// Default: `node`
    pub node_path: PathBuf,

    /// Bundle validation strategy.
    pub validator: ValidatorKind,

    /// Seconds a single bundler or validator run may take. `0` disables the limit.
    ///
    /// Default: 60
    pub timeout_secs: u64,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            esbuild_path: PathBuf::from("esbuild"),
            node_path: PathBuf::from("node"),
            validator: ValidatorKind::Structural,
            timeout_secs: 60,
        }
    }
}

impl CompilerConfig {
    /// Time budget per external tool run, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
