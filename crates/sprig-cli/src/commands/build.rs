//! `sprig build`: production build of the whole project.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use sprig_bundler::{BundleCapability, RolldownBundler};

use crate::cli::BuildArgs;
use crate::config::ConfigOverrides;
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the build command.
///
/// Per-file problems are printed and counted; the command fails once the
/// whole tree has been processed if any of them was an error.
pub async fn execute(args: BuildArgs, config_path: Option<&Path>) -> Result<()> {
    let started = Instant::now();
    let overrides = ConfigOverrides {
        output_dir: args.out_dir,
        minify: args.minify,
        bundle: args.bundle,
        concurrency: args.concurrency,
        ..Default::default()
    };
    let (cwd, config) = super::load_config(config_path, &overrides)?;

    ui::info(&format!(
        "Building {} into {}",
        config.source_dir.display(),
        config.output_dir.display()
    ));

    let bundler: Arc<dyn BundleCapability> =
        Arc::new(RolldownBundler::new(&cwd).with_namespace(config.namespace()));
    let result = sprig_core::build(&config.build_config(), bundler).await?;

    for warning in &result.warnings {
        ui::warning(&warning.text);
    }
    for error in &result.errors {
        ui::error(&error.text);
    }

    if !result.is_success() {
        return Err(CliError::Build(format!(
            "Build failed with {} error(s).",
            result.errors.len()
        )));
    }

    ui::success(&format!(
        "Wrote {} file(s) in {}",
        result.output_files.len(),
        ui::format_duration(started.elapsed())
    ));
    ui::info("Run `sprig serve` to preview the build.");
    Ok(())
}
