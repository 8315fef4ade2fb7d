//! `sprig start`: development server.

use std::path::Path;
use std::sync::Arc;

use sprig_bundler::{BundleCapability, RolldownBundler};

use crate::cli::StartArgs;
use crate::config::ConfigOverrides;
use crate::error::Result;
use crate::server;
use crate::ui;

pub async fn execute(args: StartArgs, config_path: Option<&Path>) -> Result<()> {
    let overrides = ConfigOverrides {
        host: args.host,
        port: args.port,
        // Scripts are transformed one module at a time unless asked otherwise.
        bundle: Some(args.bundle.unwrap_or(false)),
        ..Default::default()
    };
    let (cwd, config) = super::load_config(config_path, &overrides)?;

    let bundler: Arc<dyn BundleCapability> =
        Arc::new(RolldownBundler::new(&cwd).with_namespace(config.namespace()));
    let handle = server::start(config.dev_server_config(), bundler).await?;

    ui::success(&format!("Development server running at {}", handle.url()));
    ui::info("Press Ctrl-C to stop.");
    super::run_until_stopped(handle).await?;
    Ok(())
}
