//! Rolldown plugins used by [`RolldownBundler`](crate::RolldownBundler).
//!
//! - [`PackageNamespacePlugin`] turns bare imports into external namespace URLs.
//! - [`ExternalRelativePlugin`] keeps relative imports external so the browser
//!   fetches each module on its own.

mod namespace;

pub use namespace::{ExternalRelativePlugin, PackageNamespacePlugin, relative_external_id};
