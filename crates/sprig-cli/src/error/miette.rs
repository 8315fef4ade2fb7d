//! Miette report conversion for CLI errors.

use crate::error::CliError;
use crate::server::ServerError;
use miette::Report;

/// Convert a CliError into a miette report for rendering in `main`.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => miette::miette!("{}", e),
        CliError::Server(ServerError::Bind { addr, source }) => miette::miette!(
            help = "Another process may be using this port. Try --port <other>.",
            "Failed to bind {}: {}",
            addr,
            source
        ),
        CliError::Core(e @ sprig_core::Error::Filesystem { .. }) => miette::miette!(
            help = "Check that the output directory is writable.",
            "{}",
            e
        ),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_message_preserved() {
        let report = cli_error_to_miette(CliError::Build("Build failed with 1 error(s).".into()));
        assert_eq!(report.to_string(), "Build failed with 1 error(s).");
    }
}
