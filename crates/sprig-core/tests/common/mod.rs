#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use sprig_bundler::{BundleCapability, CompileOptions, Error, OutputFile, Result};
use tempfile::TempDir;

/// Marker that makes [`FakeBundler`] report a compile error for a file.
pub const SYNTAX_ERROR: &str = "@@syntax-error@@";

/// Deterministic stand-in for the Rolldown adapter.
///
/// Each entry becomes `<stem>.js` (or `<stem>.css`) whose contents name the
/// operation and echo the source.
#[derive(Debug, Default)]
pub struct FakeBundler {
    calls: Mutex<Vec<String>>,
}

impl FakeBundler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn compile(&self, op: &str, entry: &Path, options: &CompileOptions) -> Result<OutputFile> {
        self.calls.lock().push(format!("{op} {}", entry.display()));
        let source = fs::read_to_string(entry)?;
        if source.contains(SYNTAX_ERROR) {
            return Err(Error::Bundle(vec![format!(
                "Unexpected token in {}",
                entry.display()
            )]));
        }
        let stem = entry
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = if entry.extension().is_some_and(|e| e == "css") {
            "css"
        } else {
            "js"
        };
        Ok(OutputFile::new(
            format!("{stem}.{ext}"),
            format!("/* {op} {} */\n{source}", options.mode),
        ))
    }
}

#[async_trait]
impl BundleCapability for FakeBundler {
    async fn transform(&self, entry: &Path, options: &CompileOptions) -> Result<OutputFile> {
        self.compile("transform", entry, options)
    }

    async fn bundle(
        &self,
        entries: &[PathBuf],
        options: &CompileOptions,
    ) -> Result<Vec<OutputFile>> {
        entries
            .iter()
            .map(|entry| self.compile("bundle", entry, options))
            .collect()
    }

    async fn bundle_package(
        &self,
        specifier: &str,
        _options: &CompileOptions,
    ) -> Result<Vec<OutputFile>> {
        self.calls.lock().push(format!("package {specifier}"));
        Ok(vec![OutputFile::new(
            format!("{specifier}.js"),
            format!("export default {specifier:?};"),
        )])
    }
}

/// Write `files` under a fresh temporary directory.
pub fn fixture(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for (path, contents) in files {
        write(temp.path(), path, contents.as_bytes());
    }
    temp
}

pub fn write(root: &Path, path: &str, contents: &[u8]) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, contents).unwrap();
}

pub fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path)).unwrap()
}
