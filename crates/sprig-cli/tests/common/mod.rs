#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use sprig_bundler::{BundleCapability, CompileOptions, Error, OutputFile, Result};
use tempfile::TempDir;

/// Marker that makes [`FakeBundler`] report a compile error for a file.
pub const SYNTAX_ERROR: &str = "@@syntax-error@@";

/// Package specifier for which [`FakeBundler`] returns two outputs.
pub const SPLIT_PACKAGE: &str = "split-package";

/// Stand-in for the Rolldown adapter.
///
/// Compiled files echo the operation, mode and source. Package bundles
/// export their own specifier, optionally after a delay so that concurrent
/// requests overlap.
#[derive(Debug, Default)]
pub struct FakeBundler {
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeBundler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
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
        Ok(OutputFile::new(
            "out.js",
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
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let file = OutputFile::new(
            format!("{specifier}.js"),
            format!("export default {specifier:?};"),
        );
        if specifier == SPLIT_PACKAGE {
            return Ok(vec![file.clone(), file]);
        }
        Ok(vec![file])
    }
}

/// Write `files` under a fresh temporary directory.
pub fn fixture(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for (path, contents) in files {
        let full = temp.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, contents).unwrap();
    }
    temp
}
