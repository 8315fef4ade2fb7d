use std::borrow::Cow;
use std::path::Path;

use rolldown_common::ResolvedExternal;
use rolldown_plugin::{
    HookResolveIdArgs, HookResolveIdOutput, HookResolveIdReturn, HookUsage, Plugin, PluginContext,
};
use tracing::trace;

use crate::namespace::{PackageNamespace, is_bare_specifier};

/// Rewrites bare imports to external namespace URLs.
///
/// Entry specifiers (no importer) are left for Rolldown to resolve, which is
/// what lets `bundle_package("react")` bundle the package itself while its
/// imports of other packages stay external.
#[derive(Debug, Clone)]
pub struct PackageNamespacePlugin {
    namespace: PackageNamespace,
}

impl PackageNamespacePlugin {
    pub fn new(namespace: PackageNamespace) -> Self {
        Self { namespace }
    }
}

impl Plugin for PackageNamespacePlugin {
    fn name(&self) -> Cow<'static, str> {
        "sprig-package-namespace".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs<'_>,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let specifier = args.specifier.to_string();
        let is_entry = args.importer.is_none();
        let namespace = self.namespace.clone();

        async move {
            if is_entry || !is_bare_specifier(&specifier) {
                return Ok(None);
            }

            let url = namespace.url_for(&specifier);
            trace!("[sprig-namespace] {} -> {}", specifier, url);
            Ok(Some(HookResolveIdOutput {
                id: url.into(),
                external: Some(ResolvedExternal::Bool(true)),
                ..Default::default()
            }))
        }
    }
}

/// Keeps relative imports external so each module is compiled on request.
#[derive(Debug, Clone, Default)]
pub struct ExternalRelativePlugin;

impl Plugin for ExternalRelativePlugin {
    fn name(&self) -> Cow<'static, str> {
        "sprig-external-relative".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs<'_>,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let specifier = args.specifier.to_string();
        let is_entry = args.importer.is_none();

        async move {
            if is_entry {
                return Ok(None);
            }
            let Some(id) = relative_external_id(&specifier) else {
                return Ok(None);
            };
            Ok(Some(HookResolveIdOutput {
                id: id.into(),
                external: Some(ResolvedExternal::Bool(true)),
                ..Default::default()
            }))
        }
    }
}

/// The external id for a relative import, or `None` if `specifier` is not relative.
///
/// Extensionless imports gain `.js` since the browser performs no resolution.
pub fn relative_external_id(specifier: &str) -> Option<String> {
    if !(specifier.starts_with("./") || specifier.starts_with("../")) {
        return None;
    }
    if Path::new(specifier).extension().is_some() {
        Some(specifier.to_string())
    } else {
        Some(format!("{specifier}.js"))
    }
}
