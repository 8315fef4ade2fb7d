#![cfg_attr(docsrs, feature(doc_cfg))]

//! # sprig-core
//!
//! The sprig asset pipeline: HTML entry discovery and rewriting, plus the
//! concurrent build orchestrator that turns a source tree into a deployable
//! output tree.
//!
//! Script and style compilation is delegated to a
//! [`BundleCapability`](sprig_bundler::BundleCapability).
//!
//! ```no_run
//! use std::sync::Arc;
//! use sprig_bundler::RolldownBundler;
//! use sprig_core::{BuildConfig, build};
//!
//! # #[tokio::main]
//! # async fn main() -> sprig_core::Result<()> {
//! let config = BuildConfig::new("src", "static", "dist");
//! let result = build(&config, Arc::new(RolldownBundler::new("."))).await?;
//! for error in &result.errors {
//!     eprintln!("error: {error}");
//! }
//! # Ok(()) }
//! ```

pub mod asset;
pub mod build;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fs;
pub mod html;
pub mod registry;

pub use asset::{Asset, AssetKind};
pub use build::{BuildResult, build};
pub use config::BuildConfig;
pub use diagnostics::{DiagnosticsLog, Message, MessageKind};
pub use error::{Error, Result};
pub use html::{HtmlEntry, HtmlEntryProcessor, ProcessedHtml};
pub use registry::DestinationRegistry;
