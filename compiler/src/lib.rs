//! TSX compiler for the Vibe app router.
//!
//! Turns one `.tsx` component into a self-contained HTML document that a
//! browser can run with no client-side build step.
//!
//! # Pipeline
//!
//! 1. Prepend the JSX pragma pair to the source
//! 2. Write it into a fresh scratch directory
//! 3. Bundle it through a [`Bundler`] (esbuild by default) with React external
//! 4. Replace the debug-owner `this` argument of `jsxDEV` calls
//! 5. Validate the bundle through a [`BundleValidator`]
//! 6. Wrap it in an HTML document that maps `react` to the CDN globals
//!
//! Nothing is cached: every call runs the whole pipeline.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vibe_compiler::{CompilerConfig, TsxCompiler};
//!
//! # async fn run() -> Result<(), vibe_compiler::CompileError> {
//! let compiler = TsxCompiler::from_config(&CompilerConfig::default());
//! let module = compiler.compile("calculator", Path::new("public/apps/tsx/calculator.tsx")).await?;
//! assert!(module.document.contains("<script type=\"module\">"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod bundler;
mod compiler;
mod config;
mod document;
mod error;
mod postprocess;
mod process;
mod validate;

pub use bundler::{BundleOptions, Bundler, EsbuildBundler};
pub use compiler::{CompiledModule, TsxCompiler, JSX_PRAGMA};
pub use config::{CompilerConfig, ValidatorKind};
pub use document::{render_document, render_error_page};
pub use error::{CompileError, CompileResult};
pub use postprocess::strip_debug_owner;
pub use validate::{BundleValidator, NodeCheckValidator, StructuralValidator};
