use std::io;
use std::path::{Path, PathBuf};

/// Errors raised by the asset pipeline.
///
/// Every variant names the file it concerns so a message in the build report
/// can be traced back to its source.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Directory reset, copy, read or write failure.
    #[error("{action} '{}': {source}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An HTML document could not be read as text.
    #[error("failed to parse '{}': {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// The bundling capability rejected an entry.
    #[error("failed to compile '{}': {source}", path.display())]
    Bundle {
        path: PathBuf,
        #[source]
        source: sprig_bundler::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn filesystem(action: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Filesystem {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn bundle(path: impl AsRef<Path>, source: sprig_bundler::Error) -> Self {
        Error::Bundle {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// The path this error concerns.
    pub fn path(&self) -> &Path {
        match self {
            Error::Filesystem { path, .. } | Error::Parse { path, .. } | Error::Bundle { path, .. } => {
                path
            }
        }
    }
}
