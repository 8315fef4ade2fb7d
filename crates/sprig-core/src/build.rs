//! The concurrent build orchestrator.
//!
//! A build resets the output directory, overlays the static directory, then
//! walks the source directory and spawns one task per HTML entry or plain
//! file. Failures are logged per file and the walk continues; the caller
//! decides whether the build failed from [`BuildResult::errors`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use path_clean::PathClean;
use sprig_bundler::BundleCapability;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::asset::{Asset, AssetKind};
use crate::config::BuildConfig;
use crate::diagnostics::{DiagnosticsLog, Message};
use crate::fs::{copy_file, reset_dir, write_file};
use crate::html::HtmlEntryProcessor;
use crate::registry::{Claim, DestinationRegistry, Origin};
use crate::Result;

/// Snapshot of a finished build.
#[derive(Debug, Clone, Default)]
pub struct BuildResult {
    pub errors: Vec<Message>,
    pub warnings: Vec<Message>,
    /// Files written, relative to the output directory.
    pub output_files: Vec<PathBuf>,
}

impl BuildResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// State shared by every task of one build.
#[derive(Clone)]
struct BuildContext {
    config: Arc<BuildConfig>,
    log: DiagnosticsLog,
    registry: DestinationRegistry,
}

impl BuildContext {
    fn relative_output<'a>(&self, destination: &'a Path) -> &'a Path {
        destination
            .strip_prefix(&self.config.output_dir)
            .unwrap_or(destination)
    }

    /// Claim `destination` for `source`, logging collisions.
    ///
    /// Returns `false` when the caller must skip the write.
    fn claim(&self, destination: &Path, source: &Path, origin: Origin) -> bool {
        let relative = self.relative_output(destination);
        let claim = self.registry.claim(relative, source, origin);
        self.accept(claim, relative, source)
    }

    fn accept(&self, claim: Claim, relative: &Path, source: &Path) -> bool {
        match claim {
            Claim::Granted => true,
            Claim::Shared { owner } => {
                debug!(
                    "[sprig-build] '{}' shares '{}' with '{}'",
                    source.display(),
                    relative.display(),
                    owner.display()
                );
                false
            }
            Claim::OverridesStatic { static_source } => {
                self.log.add_warning(format!(
                    "'{}' overrides static file '{}'",
                    source.display(),
                    static_source.display()
                ));
                true
            }
            Claim::Conflict { owner } => {
                self.log.add_error(format!(
                    "'{}' and '{}' both write '{}'; keeping the output of '{}'",
                    owner.display(),
                    source.display(),
                    relative.display(),
                    owner.display()
                ));
                false
            }
        }
    }

    async fn copy(&self, source: &Path, destination: &Path, origin: Origin) {
        if !self.claim(destination, source, origin) {
            return;
        }
        match copy_file(source, destination).await {
            Ok(()) => self
                .registry
                .mark_written(self.relative_output(destination)),
            Err(e) => self.log.add_error(e.to_string()),
        }
    }

    async fn write(&self, source: &Path, destination: &Path, contents: &[u8]) -> Result<()> {
        let relative = self.relative_output(destination);
        let claim = self.registry.claim_contents(relative, source, contents);
        if !self.accept(claim, relative, source) {
            return Ok(());
        }
        write_file(destination, contents).await?;
        self.registry
            .mark_written(self.relative_output(destination));
        Ok(())
    }
}

/// Build `config.source_dir` into `config.output_dir`.
///
/// Only a failure to reset the output directory is returned as `Err`; every
/// per-file failure ends up in [`BuildResult::errors`].
pub async fn build(config: &BuildConfig, bundler: Arc<dyn BundleCapability>) -> Result<BuildResult> {
    let start = Instant::now();
    let config = BuildConfig {
        source_dir: config.source_dir.clean(),
        static_dir: config.static_dir.clean(),
        output_dir: config.output_dir.clean(),
        ..config.clone()
    };
    reset_dir(&config.output_dir).await?;

    let ctx = BuildContext {
        config: Arc::new(config.clone()),
        log: DiagnosticsLog::new(),
        registry: DestinationRegistry::new(),
    };

    copy_static_dir(&ctx).await;

    let processor = HtmlEntryProcessor::new(
        config.source_dir.clone(),
        bundler,
        config.compile_options(),
    )
    .bundle(config.bundle);

    let semaphore = config.concurrency.map(|limit| Arc::new(Semaphore::new(limit.max(1))));
    let mut tasks = JoinSet::new();

    for entry in WalkDir::new(&config.source_dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                ctx.log.add_error(format!("failed to read source directory: {e}"));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let asset = Asset::new(entry.into_path());
        let Some(destination) = config.output_path_for(&asset.path) else {
            continue;
        };
        let kind = asset.kind();
        let source = asset.path;
        if kind == AssetKind::EntrySource {
            debug!("[sprig-build] {} is only emitted through HTML", source.display());
            continue;
        }

        let ctx = ctx.clone();
        let processor = processor.clone();
        let semaphore = semaphore.clone();
        tasks.spawn(async move {
            let _permit = match semaphore {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            match kind {
                AssetKind::Html => build_html(&ctx, &processor, &source, &destination).await,
                _ => ctx.copy(&source, &destination, Origin::Source).await,
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            ctx.log.add_error(format!("build task panicked: {e}"));
        }
    }

    let result = BuildResult {
        errors: ctx.log.errors(),
        warnings: ctx.log.warnings(),
        output_files: ctx.registry.written(),
    };
    info!(
        "[sprig-build] {} files, {} errors, {} warnings in {:?}",
        result.output_files.len(),
        result.errors.len(),
        result.warnings.len(),
        start.elapsed()
    );
    Ok(result)
}

async fn copy_static_dir(ctx: &BuildContext) {
    let static_dir = &ctx.config.static_dir;
    if !static_dir.is_dir() {
        debug!("[sprig-build] no static directory at {}", static_dir.display());
        return;
    }

    for entry in WalkDir::new(static_dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                ctx.log.add_error(format!("failed to read static directory: {e}"));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(static_dir) else {
            continue;
        };
        let destination = ctx.config.output_dir.join(relative);
        ctx.copy(entry.path(), &destination, Origin::Static).await;
    }
}

async fn build_html(
    ctx: &BuildContext,
    processor: &HtmlEntryProcessor,
    source: &Path,
    destination: &Path,
) {
    if let Err(e) = try_build_html(ctx, processor, source, destination).await {
        ctx.log.add_error(e.to_string());
    }
}

async fn try_build_html(
    ctx: &BuildContext,
    processor: &HtmlEntryProcessor,
    source: &Path,
    destination: &Path,
) -> Result<()> {
    debug!("[sprig-build] processing {}", source.display());
    let processed = processor.process(source).await?;

    let html = if ctx.config.minify {
        minify_html::minify(processed.html.as_bytes(), &minify_html::Cfg::new())
    } else {
        processed.html.into_bytes()
    };
    ctx.write(source, destination, &html).await?;

    let output_dir = destination.parent().unwrap_or(&ctx.config.output_dir);
    for file in &processed.scripts {
        let target = output_dir.join(&file.path).clean();
        if !target.starts_with(&ctx.config.output_dir) {
            ctx.log.add_error(format!(
                "'{}' produced '{}' outside the output directory",
                source.display(),
                file.path.display()
            ));
            continue;
        }
        ctx.write(source, &target, &file.contents).await?;
    }
    Ok(())
}
