//! Logging setup for the sprig binary.
//!
//! Library crates only emit `tracing` events; this module installs the one
//! subscriber that prints them.
//!
//! # Example
//!
//! ```rust,no_run
//! use sprig_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("Starting build");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "sprig_cli=debug,sprig_core=debug,sprig_bundler=debug";
const QUIET_FILTER: &str = "sprig_cli=error,sprig_core=error,sprig_bundler=error";
const DEFAULT_FILTER: &str = "sprig_cli=info,sprig_core=info,sprig_bundler=info";

/// Initialize the global tracing subscriber.
///
/// Levels, in order of precedence:
/// 1. `verbose`: debug for sprig crates
/// 2. `quiet`: errors only
/// 3. `RUST_LOG`, when set
/// 4. info for sprig crates
///
/// Call once, before anything logs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = build_filter(verbose, quiet);

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    // A second initialization (e.g. from tests) is not an error worth surfacing.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Whether stderr output should carry ANSI colors.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise the terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
