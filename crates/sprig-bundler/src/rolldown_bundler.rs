//! [`BundleCapability`] implemented on top of Rolldown.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use path_clean::PathClean;
use rolldown::{
    BundlerBuilder, BundlerOptions, InputItem, OutputFormat, Platform, RawMinifyOptions,
};
use rolldown_common::Output;
use rolldown_plugin::__inner::SharedPluginable;
use tracing::debug;

use crate::capability::{BundleCapability, CompileOptions, OutputFile, OutputKind};
use crate::namespace::{PackageNamespace, is_bare_specifier};
use crate::plugins::{ExternalRelativePlugin, PackageNamespacePlugin};
use crate::{Error, Result};

/// Rolldown-backed bundler rooted at a project directory.
///
/// Holds no per-call state; every operation builds a fresh Rolldown bundler
/// from the immutable [`CompileOptions`] it is given, so one instance can be
/// shared across tasks behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RolldownBundler {
    cwd: PathBuf,
    namespace: PackageNamespace,
}

impl RolldownBundler {
    /// Create a bundler resolving packages from `cwd`'s `node_modules`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            namespace: PackageNamespace::default(),
        }
    }

    /// Use a non-default package namespace for rewritten bare imports.
    pub fn with_namespace(mut self, namespace: PackageNamespace) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn namespace(&self) -> &PackageNamespace {
        &self.namespace
    }

    fn base_options(&self, imports: Vec<String>, options: &CompileOptions) -> BundlerOptions {
        BundlerOptions {
            input: Some(
                imports
                    .into_iter()
                    .map(|import| InputItem { name: None, import })
                    .collect(),
            ),
            cwd: Some(self.cwd.clone()),
            format: Some(OutputFormat::Esm),
            platform: Some(Platform::Browser),
            minify: options.minify.then(|| RawMinifyOptions::from(true)),
            define: (!options.defines.is_empty()).then(|| {
                options
                    .defines
                    .iter()
                    .map(|(identifier, replacement)| (identifier.clone(), replacement.clone()))
                    .collect()
            }),
            ..Default::default()
        }
    }

    fn entry_import(&self, entry: &Path) -> String {
        let absolute = if entry.is_absolute() {
            entry.to_path_buf()
        } else {
            self.cwd.join(entry)
        };
        absolute.clean().to_string_lossy().into_owned()
    }

    async fn run(
        &self,
        bundler_options: BundlerOptions,
        plugins: Vec<SharedPluginable>,
    ) -> Result<Vec<OutputFile>> {
        let mut bundler = BundlerBuilder::default()
            .with_options(bundler_options)
            .with_plugins(plugins)
            .build()
            .map_err(|e| Error::from_rolldown(&e))?;

        let bundle = bundler
            .generate()
            .await
            .map_err(|e| Error::from_rolldown(&e))?;

        let outputs = bundle
            .assets
            .iter()
            .map(|output| match output {
                Output::Chunk(chunk) => {
                    OutputFile::new(chunk.filename.to_string(), chunk.code.as_bytes())
                }
                Output::Asset(asset) => {
                    OutputFile::new(asset.filename.to_string(), asset.source.as_bytes())
                }
            })
            .collect();
        Ok(outputs)
    }
}

#[async_trait]
impl BundleCapability for RolldownBundler {
    async fn transform(&self, entry: &Path, options: &CompileOptions) -> Result<OutputFile> {
        let import = self.entry_import(entry);
        debug!("[sprig-bundler] transform {}", import);

        let plugins: Vec<SharedPluginable> = vec![
            Arc::new(PackageNamespacePlugin::new(self.namespace.clone())),
            Arc::new(ExternalRelativePlugin),
        ];
        let bundler_options = self.base_options(vec![import.clone()], options);
        let outputs = self.run(bundler_options, plugins).await?;
        select_transform_output(&import, outputs)
    }

    async fn bundle(
        &self,
        entries: &[PathBuf],
        options: &CompileOptions,
    ) -> Result<Vec<OutputFile>> {
        let imports: Vec<String> = entries.iter().map(|e| self.entry_import(e)).collect();
        debug!("[sprig-bundler] bundle {} entries", imports.len());

        let bundler_options = self.base_options(imports, options);
        let outputs = self.run(bundler_options, Vec::new()).await?;
        Ok(drop_stylesheet_shells(outputs))
    }

    async fn bundle_package(
        &self,
        specifier: &str,
        options: &CompileOptions,
    ) -> Result<Vec<OutputFile>> {
        if !is_bare_specifier(specifier) {
            return Err(Error::InvalidSpecifier(specifier.to_string()));
        }
        debug!("[sprig-bundler] bundle package {}", specifier);

        let plugins: Vec<SharedPluginable> = vec![Arc::new(PackageNamespacePlugin::new(
            self.namespace.clone(),
        ))];
        let bundler_options = self.base_options(vec![specifier.to_string()], options);
        self.run(bundler_options, plugins).await
    }
}

/// Pick the single file a transform call produces.
///
/// Style entries emit their stylesheet next to an empty script chunk, so the
/// output matching the entry's kind wins when there is more than one.
fn select_transform_output(import: &str, mut outputs: Vec<OutputFile>) -> Result<OutputFile> {
    if outputs.len() > 1 {
        let wants_css = import.ends_with(".css");
        outputs.retain(|file| {
            let is_css = file.path.extension().is_some_and(|ext| ext == "css");
            is_css == wants_css
        });
    }

    if outputs.len() != 1 {
        return Err(Error::OutputCount {
            entry: import.to_string(),
            count: outputs.len(),
        });
    }
    Ok(outputs.remove(0))
}

/// Remove the empty script chunks Rolldown emits alongside stylesheet entries.
///
/// Only applies when the bundle contains a stylesheet, so an empty script
/// entry on its own still yields its (empty) output.
fn drop_stylesheet_shells(mut outputs: Vec<OutputFile>) -> Vec<OutputFile> {
    if !outputs.iter().any(|file| file.kind() == OutputKind::Stylesheet) {
        return outputs;
    }
    outputs.retain(|file| {
        file.kind() != OutputKind::Script || !is_blank_script(&file.contents_lossy())
    });
    outputs
}

fn is_blank_script(code: &str) -> bool {
    code.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with("//") || line == "export {};" || line == "export {}"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_import_joins_relative_paths() {
        let bundler = RolldownBundler::new("/project");
        assert_eq!(
            bundler.entry_import(Path::new("src/./app/../main.ts")),
            "/project/src/main.ts"
        );
        assert_eq!(bundler.entry_import(Path::new("/abs/main.ts")), "/abs/main.ts");
    }

    #[test]
    fn test_select_transform_output_prefers_matching_kind() {
        let outputs = vec![
            OutputFile::new("style.js", ""),
            OutputFile::new("style.css", "body{}"),
        ];
        let selected = select_transform_output("/p/style.css", outputs).unwrap();
        assert_eq!(selected.path, PathBuf::from("style.css"));
    }

    #[test]
    fn test_drop_stylesheet_shells() {
        let outputs = vec![
            OutputFile::new("style.js", "//#region src/style.css\n//#endregion\n"),
            OutputFile::new("style.css", "body{}"),
            OutputFile::new("main.js", "console.log(1);"),
        ];
        let kept: Vec<PathBuf> = drop_stylesheet_shells(outputs)
            .into_iter()
            .map(|file| file.path)
            .collect();
        assert_eq!(kept, vec![PathBuf::from("style.css"), PathBuf::from("main.js")]);

        let lone = vec![OutputFile::new("empty.js", "")];
        assert_eq!(drop_stylesheet_shells(lone).len(), 1);
    }

    #[test]
    fn test_select_transform_output_rejects_multiple_chunks() {
        let outputs = vec![OutputFile::new("a.js", ""), OutputFile::new("b.js", "")];
        let err = select_transform_output("/p/a.js", outputs).unwrap_err();
        assert!(matches!(err, Error::OutputCount { count: 2, .. }));
    }

    #[test]
    fn test_base_options_carry_defines() {
        let bundler = RolldownBundler::new("/project");
        let options = CompileOptions::new(crate::Mode::Production).define("__DEV__", "false");
        let bundler_options = bundler.base_options(vec!["/project/main.js".to_string()], &options);
        let define = bundler_options.define.unwrap();
        let pairs: Vec<(&str, &str)> = define
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("process.env.NODE_ENV", "\"production\""), ("__DEV__", "false")]
        );
    }

    #[tokio::test]
    async fn test_bundle_package_rejects_relative_specifier() {
        let bundler = RolldownBundler::new("/project");
        let err = bundler
            .bundle_package("./local", &CompileOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSpecifier(_)));
    }
}
