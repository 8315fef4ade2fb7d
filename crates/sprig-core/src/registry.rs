//! Destination bookkeeping for a single build.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

/// Where a claimed destination's content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Static,
    Source,
}

/// Result of [`DestinationRegistry::claim`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// The destination was free.
    Granted,
    /// A source file replaces a static file copied earlier.
    OverridesStatic { static_source: PathBuf },
    /// The owner is writing byte-identical contents; nothing to do.
    Shared { owner: PathBuf },
    /// Another task already owns the destination; the caller must not write.
    Conflict { owner: PathBuf },
}

#[derive(Debug, Clone)]
struct Owner {
    origin: Origin,
    source: PathBuf,
    contents: Option<Arc<[u8]>>,
}

#[derive(Debug, Default)]
struct Inner {
    claims: HashMap<PathBuf, Owner>,
    written: Vec<PathBuf>,
}

/// Tracks which task owns each output path.
///
/// Static files are claimed before the source walk starts. A source file may
/// take over a static destination once. Two compiled outputs with identical
/// contents may share a destination, so pages referencing the same script
/// agree on one file. Any other repeated claim is refused and the first owner
/// keeps the file.
#[derive(Debug, Clone, Default)]
pub struct DestinationRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl DestinationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a destination whose contents are copied from `source`.
    pub fn claim(&self, destination: &Path, source: &Path, origin: Origin) -> Claim {
        self.claim_with(destination, source, origin, None)
    }

    /// Claim a destination for generated `contents`.
    pub fn claim_contents(&self, destination: &Path, source: &Path, contents: &[u8]) -> Claim {
        self.claim_with(destination, source, Origin::Source, Some(Arc::from(contents)))
    }

    fn claim_with(
        &self,
        destination: &Path,
        source: &Path,
        origin: Origin,
        contents: Option<Arc<[u8]>>,
    ) -> Claim {
        let mut inner = self.inner.lock();
        let owner = Owner {
            origin,
            source: source.to_path_buf(),
            contents,
        };
        match inner.claims.get(destination) {
            None => {
                inner.claims.insert(destination.to_path_buf(), owner);
                Claim::Granted
            }
            Some(existing) if existing.origin == Origin::Static && origin == Origin::Source => {
                let static_source = existing.source.clone();
                inner.claims.insert(destination.to_path_buf(), owner);
                Claim::OverridesStatic { static_source }
            }
            Some(existing) => match (&existing.contents, &owner.contents) {
                (Some(ours), Some(theirs)) if ours == theirs => Claim::Shared {
                    owner: existing.source.clone(),
                },
                _ => Claim::Conflict {
                    owner: existing.source.clone(),
                },
            },
        }
    }

    /// Record a destination whose content reached the disk.
    pub fn mark_written(&self, destination: &Path) {
        let mut inner = self.inner.lock();
        if !inner.written.iter().any(|p| p == destination) {
            inner.written.push(destination.to_path_buf());
        }
    }

    /// Written destinations, sorted.
    pub fn written(&self) -> Vec<PathBuf> {
        let mut written = self.inner.lock().written.clone();
        written.sort();
        written
    }
}
