//! The bundling capability contract.
//!
//! Everything the asset pipeline needs from a script/style compiler is captured
//! by [`BundleCapability`]. Implementations must be safe to call from many
//! tasks at once: the build orchestrator compiles HTML entries concurrently and
//! the dev server compiles once per request.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::Result;

/// The identifier replaced with the quoted mode name in compiled output.
pub const NODE_ENV_IDENTIFIER: &str = "process.env.NODE_ENV";

/// Compilation mode.
///
/// Controls the environment identifier substitution only; output is correct
/// in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable options for a single compile call.
///
/// Every call receives its own value; there is no shared bundler state that a
/// caller could mutate between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub mode: Mode,
    pub minify: bool,
    /// Identifier → replacement source text, applied in insertion order.
    pub defines: IndexMap<String, String>,
}

impl CompileOptions {
    /// Options for `mode` with the `process.env.NODE_ENV` define pre-populated.
    pub fn new(mode: Mode) -> Self {
        let mut defines = IndexMap::new();
        defines.insert(NODE_ENV_IDENTIFIER.to_string(), format!("\"{}\"", mode));
        Self {
            mode,
            minify: false,
            defines,
        }
    }

    pub fn minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn define(mut self, identifier: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.defines.insert(identifier.into(), replacement.into());
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

/// What kind of reference an output file needs in an HTML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Script,
    Stylesheet,
    Other,
}

/// A compiled file produced by the capability.
///
/// `path` is relative to whatever output location the caller chooses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Classify the file by extension.
    pub fn kind(&self) -> OutputKind {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("js" | "mjs" | "cjs") => OutputKind::Script,
            Some("css") => OutputKind::Stylesheet,
            _ => OutputKind::Other,
        }
    }

    /// Contents as UTF-8 text, replacing invalid sequences.
    pub fn contents_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.contents)
    }
}

/// Script/style compilation as seen by the asset pipeline.
#[async_trait]
pub trait BundleCapability: Send + Sync {
    /// Compile a single file without resolving its relative imports.
    ///
    /// Bare module specifiers are rewritten to the package namespace so the
    /// browser can fetch them from the dev server.
    async fn transform(&self, entry: &Path, options: &CompileOptions) -> Result<OutputFile>;

    /// Resolve and inline the dependency graph of `entries`.
    ///
    /// Produces at least one output per entry. Bare specifiers are resolved
    /// from the project's dependencies, not rewritten.
    async fn bundle(&self, entries: &[PathBuf], options: &CompileOptions)
    -> Result<Vec<OutputFile>>;

    /// Bundle one bare package specifier (e.g. `react-dom/client`).
    ///
    /// Imports of other packages stay in the namespace so shared
    /// dependencies are fetched once by the browser.
    async fn bundle_package(
        &self,
        specifier: &str,
        options: &CompileOptions,
    ) -> Result<Vec<OutputFile>>;
}
