//! HTML entry processing.
//!
//! An HTML document is the unit of entry discovery. Local `<script src>` and
//! `<link href>` references are detached from the document, compiled through
//! the [`BundleCapability`], and replaced by references to the compiled files,
//! which are emitted next to the HTML output.
//!
//! [`HtmlEntry`] holds a parsed document and is used synchronously; the
//! document type is not `Send`, so [`HtmlEntryProcessor::process`] serializes
//! the stripped document before awaiting the bundler and re-parses it after.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use path_clean::PathClean;
use scraper::{Html, Node};
use sprig_bundler::{BundleCapability, CompileOptions, OutputFile, OutputKind};
use tracing::debug;

use crate::{Error, Result};

/// How a `src`/`href` value relates to the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// `./x.js`, relative to the HTML file's directory.
    DirectoryRelative(String),
    /// `/x.js`, relative to the source root.
    RootRelative(String),
    /// Empty, protocol-relative or absolute URLs. Left untouched.
    External,
}

impl Reference {
    pub fn classify(uri: &str) -> Self {
        if let Some(rest) = uri.strip_prefix("./") {
            Reference::DirectoryRelative(rest.to_string())
        } else if uri.starts_with('/') && !uri.starts_with("//") {
            Reference::RootRelative(uri.trim_start_matches('/').to_string())
        } else {
            Reference::External
        }
    }

    /// Absolute path of a local reference.
    pub fn resolve(&self, html_dir: &Path, source_root: &Path) -> Option<PathBuf> {
        let (base, relative) = match self {
            Reference::DirectoryRelative(rest) => (html_dir, rest),
            Reference::RootRelative(rest) => (source_root, rest),
            Reference::External => return None,
        };
        let relative = relative.split(['?', '#']).next().unwrap_or(relative);
        Some(base.join(relative).clean())
    }
}

/// A parsed HTML document and the local entries extracted from it.
pub struct HtmlEntry {
    pub source_path: PathBuf,
    pub document: Html,
    pub extracted_entries: Vec<PathBuf>,
}

impl HtmlEntry {
    pub fn parse(source_path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            source_path: source_path.into(),
            document: Html::parse_document(text),
            extracted_entries: Vec::new(),
        }
    }

    /// Detach every local script and stylesheet reference.
    ///
    /// Scripts come first in document order, then links in document order.
    /// Detached nodes are gone from the tree, so a second call finds nothing.
    pub fn extract_entries(&mut self, source_root: &Path) -> &[PathBuf] {
        let html_dir = self
            .source_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        for (tag, attribute) in [("script", "src"), ("link", "href")] {
            let matches: Vec<_> = self
                .document
                .tree
                .root()
                .descendants()
                .filter_map(|node| {
                    let element = node.value().as_element()?;
                    if element.name() != tag {
                        return None;
                    }
                    let uri = element.attr(attribute)?;
                    let path = Reference::classify(uri).resolve(&html_dir, source_root)?;
                    Some((node.id(), path))
                })
                .collect();

            for (id, path) in matches {
                if let Some(mut node) = self.document.tree.get_mut(id) {
                    node.detach();
                }
                debug!(
                    "[sprig-html] {} references {}",
                    self.source_path.display(),
                    path.display()
                );
                self.extracted_entries.push(path);
            }
        }

        &self.extracted_entries
    }

    /// Reference compiled outputs from the document.
    ///
    /// Stylesheets are appended to `<head>`, scripts to the end of `<body>`,
    /// in the order given. Paths are relative to the HTML output's directory.
    pub fn attach_outputs(&mut self, outputs: &[OutputFile]) {
        let find = |name: &str| {
            self.document
                .tree
                .root()
                .descendants()
                .find(|node| {
                    node.value()
                        .as_element()
                        .is_some_and(|element| element.name() == name)
                })
                .map(|node| node.id())
        };
        let head = find("head");
        let body = find("body");

        for output in outputs {
            let href = output_reference(&output.path);
            let (parent, markup, tag) = match output.kind() {
                OutputKind::Stylesheet => (
                    head,
                    format!(r#"<link rel="stylesheet" href="{}">"#, escape_attribute(&href)),
                    "link",
                ),
                OutputKind::Script => (
                    body,
                    format!(
                        r#"<script type="module" src="{}"></script>"#,
                        escape_attribute(&href)
                    ),
                    "script",
                ),
                OutputKind::Other => continue,
            };

            let (Some(parent), Some(node)) = (parent, element_node(&markup, tag)) else {
                continue;
            };
            if let Some(mut parent) = self.document.tree.get_mut(parent) {
                parent.append(node);
            }
        }
    }

    pub fn serialize(&self) -> String {
        self.document.html()
    }
}

/// Build a detached element node by parsing a one-element fragment.
fn element_node(markup: &str, tag: &str) -> Option<Node> {
    let fragment = Html::parse_fragment(markup);
    fragment
        .tree
        .root()
        .descendants()
        .find(|node| {
            node.value()
                .as_element()
                .is_some_and(|element| element.name() == tag)
        })
        .map(|node| node.value().clone())
}

fn output_reference(path: &Path) -> String {
    let relative = path.to_string_lossy().replace('\\', "/");
    format!("./{}", relative.trim_start_matches("./"))
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

/// Result of processing one HTML entry.
#[derive(Debug, Clone)]
pub struct ProcessedHtml {
    /// The rewritten document.
    pub html: String,
    /// Compiled script and stylesheet outputs, relative to the HTML output's directory.
    pub scripts: Vec<OutputFile>,
}

/// Runs HTML entries through the bundling capability.
#[derive(Clone)]
pub struct HtmlEntryProcessor {
    source_root: PathBuf,
    bundler: Arc<dyn BundleCapability>,
    options: CompileOptions,
    bundle: bool,
}

impl HtmlEntryProcessor {
    pub fn new(
        source_root: impl Into<PathBuf>,
        bundler: Arc<dyn BundleCapability>,
        options: CompileOptions,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            bundler,
            options,
            bundle: true,
        }
    }

    /// Resolve dependency graphs (`true`, default) or compile each entry alone.
    pub fn bundle(mut self, bundle: bool) -> Self {
        self.bundle = bundle;
        self
    }

    pub async fn process(&self, path: &Path) -> Result<ProcessedHtml> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::filesystem("failed to read", path, e))?;
        let text = String::from_utf8(bytes).map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            reason: format!("not valid UTF-8: {e}"),
        })?;

        let (stripped, entries) = {
            let mut entry = HtmlEntry::parse(path, &text);
            entry.extract_entries(&self.source_root);
            (entry.serialize(), entry.extracted_entries)
        };

        if entries.is_empty() {
            return Ok(ProcessedHtml {
                html: stripped,
                scripts: Vec::new(),
            });
        }

        let outputs = self.compile(path, &entries).await?;

        let mut entry = HtmlEntry::parse(path, &stripped);
        entry.attach_outputs(&outputs);
        Ok(ProcessedHtml {
            html: entry.serialize(),
            scripts: outputs,
        })
    }

    async fn compile(&self, html_path: &Path, entries: &[PathBuf]) -> Result<Vec<OutputFile>> {
        if self.bundle {
            return self
                .bundler
                .bundle(entries, &self.options)
                .await
                .map_err(|e| Error::bundle(html_path, e));
        }

        let mut outputs = Vec::with_capacity(entries.len());
        for entry in entries {
            let output = self
                .bundler
                .transform(entry, &self.options)
                .await
                .map_err(|e| Error::bundle(html_path, e))?;
            outputs.push(output);
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> (HtmlEntry, Vec<PathBuf>) {
        let mut entry = HtmlEntry::parse("/site/src/pages/index.html", html);
        let entries = entry.extract_entries(Path::new("/site/src")).to_vec();
        (entry, entries)
    }

    #[test]
    fn test_classify_references() {
        assert_eq!(
            Reference::classify("./main.js"),
            Reference::DirectoryRelative("main.js".to_string())
        );
        assert_eq!(
            Reference::classify("/app/main.js"),
            Reference::RootRelative("app/main.js".to_string())
        );
        assert_eq!(Reference::classify("//cdn.example.com/a.js"), Reference::External);
        assert_eq!(Reference::classify("https://example.com/a.js"), Reference::External);
        assert_eq!(Reference::classify("main.js"), Reference::External);
        assert_eq!(Reference::classify(""), Reference::External);
    }

    #[test]
    fn test_resolve_strips_query_and_normalizes() {
        let reference = Reference::classify("./lib/../main.js?v=3");
        assert_eq!(
            reference.resolve(Path::new("/site/src/pages"), Path::new("/site/src")),
            Some(PathBuf::from("/site/src/pages/main.js"))
        );
    }

    #[test]
    fn test_extracts_scripts_before_links() {
        let (entry, entries) = extract(
            r#"<html><head><link rel="stylesheet" href="/styles/app.css"></head>
            <body><script src="./main.js"></script><script src="/vendor.js"></script></body></html>"#,
        );
        assert_eq!(
            entries,
            vec![
                PathBuf::from("/site/src/pages/main.js"),
                PathBuf::from("/site/src/vendor.js"),
                PathBuf::from("/site/src/styles/app.css"),
            ]
        );
        let html = entry.serialize();
        assert!(!html.contains("main.js"));
        assert!(!html.contains("app.css"));
    }

    #[test]
    fn test_external_references_untouched() {
        let (entry, entries) = extract(
            r#"<html><head><link rel="stylesheet" href="https://fonts.example.com/a.css"></head>
            <body><script src="//cdn.example.com/a.js"></script><script>inline()</script></body></html>"#,
        );
        assert!(entries.is_empty());
        let html = entry.serialize();
        assert!(html.contains("//cdn.example.com/a.js"));
        assert!(html.contains("https://fonts.example.com/a.css"));
        assert!(html.contains("inline()"));
    }

    #[test]
    fn test_second_extraction_finds_nothing() {
        let (mut entry, entries) = extract(r#"<body><script src="./main.js"></script></body>"#);
        assert_eq!(entries.len(), 1);
        let before = entry.extracted_entries.len();
        entry.extract_entries(Path::new("/site/src"));
        assert_eq!(entry.extracted_entries.len(), before);
    }

    #[test]
    fn test_attach_outputs_places_nodes() {
        let (mut entry, _) = extract(
            r#"<html><head><title>t</title></head><body><p>content</p><script src="./main.js"></script></body></html>"#,
        );
        entry.attach_outputs(&[
            OutputFile::new("main.js", "console.log(1)"),
            OutputFile::new("main.css", "p{}"),
            OutputFile::new("logo.svg", "<svg/>"),
        ]);
        let html = entry.serialize();

        let link = html.find(r#"<link rel="stylesheet" href="./main.css">"#).unwrap();
        let head_end = html.find("</head>").unwrap();
        assert!(link < head_end);

        let content = html.find("<p>content</p>").unwrap();
        let script = html
            .find(r#"<script type="module" src="./main.js"></script>"#)
            .unwrap();
        let body_end = html.find("</body>").unwrap();
        assert!(content < script && script < body_end);
        assert!(!html.contains("logo.svg"));
    }
}
