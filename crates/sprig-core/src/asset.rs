//! Source file classification and lazily loaded file contents.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Extensions of script/style sources that only reach the output through an
/// HTML entry.
pub const ENTRY_SOURCE_EXTENSIONS: &[&str] =
    &["js", "mjs", "cjs", "jsx", "ts", "tsx", "mts", "cts", "css"];

/// Extensions the dev server compiles on request.
pub const COMPILED_EXTENSIONS: &[&str] = &["js", "mjs", "jsx", "ts", "tsx"];

/// How the build orchestrator treats a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// An HTML entry document.
    Html,
    /// A script or stylesheet, emitted only when an HTML entry references it.
    EntrySource,
    /// Anything else, copied verbatim.
    Static,
}

/// A file in the source tree.
///
/// `contents` is `None` until [`Asset::load`] reads it from disk.
#[derive(Debug, Clone)]
pub struct Asset {
    pub path: PathBuf,
    pub contents: Option<Vec<u8>>,
}

impl Asset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            contents: None,
        }
    }

    pub fn kind(&self) -> AssetKind {
        classify(&self.path)
    }

    /// Return the contents, reading them from disk on first use.
    pub async fn load(&mut self) -> Result<&[u8]> {
        if self.contents.is_none() {
            let bytes = tokio::fs::read(&self.path)
                .await
                .map_err(|e| Error::filesystem("failed to read", &self.path, e))?;
            self.contents = Some(bytes);
        }
        Ok(self.contents.as_deref().unwrap_or_default())
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Classify a source file by its extension.
pub fn classify(path: &Path) -> AssetKind {
    match extension(path).as_deref() {
        Some("html") => AssetKind::Html,
        Some(ext) if ENTRY_SOURCE_EXTENSIONS.contains(&ext) => AssetKind::EntrySource,
        _ => AssetKind::Static,
    }
}

/// Whether the dev server compiles this file instead of serving it raw.
pub fn is_compiled_source(path: &Path) -> bool {
    extension(path).is_some_and(|ext| COMPILED_EXTENSIONS.contains(&ext.as_str()))
}

/// Content type for a raw file served by extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match extension(path).as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs" | "cjs") => "text/javascript; charset=utf-8",
        Some("json" | "map") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",
        Some("wasm") => "application/wasm",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("pdf") => "application/pdf",
        Some("webmanifest") => "application/manifest+json",
        _ => "application/octet-stream",
    }
}
