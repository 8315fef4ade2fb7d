//! Sprig CLI: production builds, the development server and scaffolding.
//!
//! - [`config`] - `sprig.toml` / `SPRIG_*` / flag merging
//! - [`server`] - development and static HTTP servers
//! - [`commands`] - one module per subcommand
//! - [`error`] - error types and `miette` conversion
//! - [`logger`] and [`ui`] - terminal output
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sprig_bundler::RolldownBundler;
//! use sprig_cli::server::{self, DevServerConfig};
//!
//! # async fn run() -> Result<(), server::ServerError> {
//! let bundler = Arc::new(RolldownBundler::new("."));
//! let handle = server::start(DevServerConfig::new("src", "static"), bundler).await?;
//! println!("listening on {}", handle.url());
//! handle.wait().await
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod server;
pub mod ui;

pub use error::{CliError, ConfigError, Result};
