//! Command implementations.
//!
//! Each command lives in its own module and exposes an `execute` function
//! taking its parsed arguments plus the global `--config` path.

pub mod build;
pub mod new;
pub mod serve;
pub mod start;

pub use build::execute as build_execute;
pub use new::execute as new_execute;
pub use serve::execute as serve_execute;
pub use start::execute as start_execute;

use std::path::{Path, PathBuf};

use crate::config::{ConfigOverrides, ProjectConfig};
use crate::error::Result;
use crate::server::{ServerError, ServerHandle};
use crate::ui;

fn current_dir() -> Result<PathBuf> {
    Ok(std::env::current_dir()?)
}

fn load_config(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<(PathBuf, ProjectConfig)> {
    let cwd = current_dir()?;
    let config = ProjectConfig::load(&cwd, config_path, overrides)?;
    Ok((cwd, config))
}

/// Block until the server exits, stopping it on Ctrl-C.
async fn run_until_stopped(handle: ServerHandle) -> Result<(), ServerError> {
    let stopper = handle.stopper();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ui::info("Shutting down...");
            stopper.stop();
        }
    });
    handle.wait().await
}
