#![cfg_attr(docsrs, feature(doc_cfg))]

//! # sprig-bundler
//!
//! The bundling capability used by the sprig asset pipeline.
//!
//! The pipeline never parses or transforms script syntax itself. It talks to a
//! [`BundleCapability`] which offers three operations:
//!
//! - [`BundleCapability::transform`] compiles one file, leaves its relative
//!   imports for the browser to fetch and rewrites bare specifiers into the
//!   package namespace (`/web_modules/react.js`).
//! - [`BundleCapability::bundle`] resolves the full dependency graph of a set
//!   of entries into self-contained output files.
//! - [`BundleCapability::bundle_package`] bundles a single bare specifier for
//!   the dev server's package namespace.
//!
//! [`RolldownBundler`] is the production implementation built on Rolldown.
//!
//! ```no_run
//! use sprig_bundler::{BundleCapability, CompileOptions, Mode, RolldownBundler};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bundler = RolldownBundler::new(".");
//! let options = CompileOptions::new(Mode::Production).minify(true);
//! let outputs = bundler
//!     .bundle(&[PathBuf::from("src/main.ts")], &options)
//!     .await?;
//! for file in &outputs {
//!     println!("{} ({} bytes)", file.path.display(), file.contents.len());
//! }
//! # Ok(()) }
//! ```

pub mod capability;
pub mod diagnostics;
pub mod namespace;
pub mod plugins;
pub mod rolldown_bundler;

pub use capability::{BundleCapability, CompileOptions, Mode, OutputFile, OutputKind};
pub use namespace::PackageNamespace;
pub use rolldown_bundler::RolldownBundler;

/// Error types for bundling operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Compilation or resolution failure reported by the bundling engine.
    #[error("{}", format_messages(.0))]
    Bundle(Vec<String>),

    /// The engine produced a different number of files than the operation requires.
    #[error("expected exactly one output for {entry}, got {count}")]
    OutputCount { entry: String, count: usize },

    /// A package namespace request did not name a usable bare specifier.
    #[error("invalid package specifier: '{0}'")]
    InvalidSpecifier(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for bundling operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a bundle error from a Rolldown error value.
    pub fn from_rolldown(error: &dyn std::fmt::Debug) -> Self {
        Error::Bundle(diagnostics::messages_from_rolldown(error))
    }

    /// The individual diagnostic messages carried by this error.
    ///
    /// Engine failures keep one entry per reported diagnostic; every other
    /// variant yields its display text as a single message.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Error::Bundle(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

fn format_messages(messages: &[String]) -> String {
    match messages {
        [] => "Unknown bundler error".to_string(),
        [single] => single.clone(),
        many => format!("{} errors: {}", many.len(), many.join("; ")),
    }
}
