//! The virtual package namespace.
//!
//! Bare module specifiers are served by the dev server under a reserved URL
//! prefix: `react` becomes `/web_modules/react.js`, `@scope/pkg/sub` becomes
//! `/web_modules/@scope/pkg/sub.js`.

use crate::{Error, Result};

/// Suffix appended to every namespace URL.
pub const COMPILED_SUFFIX: &str = ".js";

/// Default namespace root.
pub const DEFAULT_ROOT: &str = "web_modules";

/// Maps bare specifiers to namespace URLs and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNamespace {
    root: String,
}

impl PackageNamespace {
    /// Create a namespace rooted at `/<root>/`.
    ///
    /// Surrounding slashes are ignored, so `web_modules`, `/web_modules` and
    /// `/web_modules/` are equivalent.
    pub fn new(root: impl AsRef<str>) -> Self {
        Self {
            root: root.as_ref().trim_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// The URL prefix including both slashes, e.g. `/web_modules/`.
    pub fn prefix(&self) -> String {
        format!("/{}/", self.root)
    }

    /// URL under which `specifier` is served.
    pub fn url_for(&self, specifier: &str) -> String {
        format!("{}{}{}", self.prefix(), specifier, COMPILED_SUFFIX)
    }

    /// Whether a request path falls under the namespace.
    pub fn contains(&self, request_path: &str) -> bool {
        request_path.starts_with(&self.prefix())
    }

    /// Recover the bare specifier from a namespace request path.
    ///
    /// Returns `Ok(None)` when the path is outside the namespace.
    pub fn specifier_for(&self, request_path: &str) -> Result<Option<String>> {
        let Some(rest) = request_path.strip_prefix(&self.prefix()) else {
            return Ok(None);
        };
        let specifier = rest.strip_suffix(COMPILED_SUFFIX).unwrap_or(rest);
        if !is_bare_specifier(specifier) {
            return Err(Error::InvalidSpecifier(specifier.to_string()));
        }
        Ok(Some(specifier.to_string()))
    }
}

impl Default for PackageNamespace {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

/// Whether an import specifier names a package rather than a path or URL.
pub fn is_bare_specifier(specifier: &str) -> bool {
    let Some(first) = specifier.chars().next() else {
        return false;
    };
    if !(first == '@' || first.is_ascii_alphanumeric() || first == '_') {
        return false;
    }
    if specifier.contains("://") || specifier.starts_with("data:") {
        return false;
    }
    specifier
        .split('/')
        .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}
