//! `sprig serve`: plain static file server.

use std::path::Path;

use crate::cli::ServeArgs;
use crate::config::ConfigOverrides;
use crate::error::{CliError, Result};
use crate::server;
use crate::ui;

pub async fn execute(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let overrides = ConfigOverrides {
        host: args.host,
        port: args.port,
        ..Default::default()
    };
    let (cwd, config) = super::load_config(config_path, &overrides)?;

    let dir = args.dir.map(|dir| cwd.join(dir));
    let server_config = config.static_server_config(dir.as_deref());
    if !server_config.dir.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "'{}' is not a directory. Run `sprig build` first or pass --dir.",
            server_config.dir.display()
        )));
    }

    let handle = server::serve(server_config.clone()).await?;
    ui::success(&format!(
        "Serving {} at {}",
        server_config.dir.display(),
        handle.url()
    ));
    super::run_until_stopped(handle).await?;
    Ok(())
}
