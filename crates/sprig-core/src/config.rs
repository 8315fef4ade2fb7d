//! Build configuration.

use std::path::{Path, PathBuf};

use sprig_bundler::{CompileOptions, Mode};

/// Immutable settings for one [`build`](crate::build) invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Root of HTML entries and the files they reference.
    pub source_dir: PathBuf,

    /// Copied verbatim into the output first. Skipped if it does not exist.
    pub static_dir: PathBuf,

    /// Cleared at the start of the build.
    pub output_dir: PathBuf,

    /// Minify compiled scripts/styles and HTML documents.
    pub minify: bool,

    /// Resolve dependency graphs instead of compiling each entry alone.
    pub bundle: bool,

    /// Maximum number of file tasks running at once. Unbounded when `None`.
    pub concurrency: Option<usize>,

    pub mode: Mode,
}

impl BuildConfig {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        static_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            static_dir: static_dir.into(),
            output_dir: output_dir.into(),
            minify: true,
            bundle: true,
            concurrency: None,
            mode: Mode::Production,
        }
    }

    pub fn minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn bundle(mut self, bundle: bool) -> Self {
        self.bundle = bundle;
        self
    }

    pub fn concurrency(mut self, limit: Option<usize>) -> Self {
        self.concurrency = limit;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::new(self.mode).minify(self.minify)
    }

    /// Destination of a source-tree file, mirroring its relative path.
    pub fn output_path_for(&self, source: &Path) -> Option<PathBuf> {
        source
            .strip_prefix(&self.source_dir)
            .ok()
            .map(|rel| self.output_dir.join(rel))
    }
}
