//! Error types for the sprig CLI.
//!
//! Commands return [`CliError`]; `main` converts it into a `miette` report via
//! [`cli_error_to_miette`].

mod miette;

pub use self::miette::cli_error_to_miette;

use std::path::PathBuf;
use thiserror::Error;

use crate::server::ServerError;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (unreadable file, invalid values)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The build could not start or finished with errors
    #[error("{0}")]
    Build(String),

    /// Pipeline errors that abort a whole command
    #[error("{0}")]
    Core(#[from] sprig_core::Error),

    /// Development or static server errors
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An external program (`git`, `npm`) failed
    #[error("Command `{command}` failed: {reason}")]
    Command { command: String, reason: String },

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Explicit `--config` path does not exist
    #[error("Config file not found: {}\n\nHint: Create a sprig.toml file or omit --config", .0.display())]
    NotFound(PathBuf),

    /// Figment could not merge or deserialize the configuration
    #[error("Failed to load configuration: {0}")]
    Load(String),

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(err.to_string())
    }
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound(PathBuf::from("custom.toml"));
        let msg = err.to_string();
        assert!(msg.contains("Config file not found"));
        assert!(msg.contains("custom.toml"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "port".to_string(),
            value: "0".to_string(),
            hint: "Use a port between 1 and 65535".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'port': 0"));
        assert!(msg.contains("Hint: Use a port"));
    }

    #[test]
    fn test_cli_error_from_config_error() {
        let cli_err: CliError = ConfigError::Load("bad toml".to_string()).into();
        assert!(matches!(cli_err, CliError::Config(_)));
    }

    #[test]
    fn test_build_error_display_is_verbatim() {
        let err = CliError::Build("Build failed with 2 error(s).".to_string());
        assert_eq!(err.to_string(), "Build failed with 2 error(s).");
    }
}
