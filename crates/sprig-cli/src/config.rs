//! Project configuration.
//!
//! Sources, highest priority first: CLI flags, `SPRIG_*` environment
//! variables, `sprig.toml` in the working directory, built-in defaults.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use sprig_bundler::{Mode, PackageNamespace};
use sprig_core::BuildConfig;

use crate::error::{ConfigError, Result};
use crate::server::{DevServerConfig, StaticServerConfig};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "sprig.toml";

/// Prefix of environment overrides, e.g. `SPRIG_PORT=8080`.
pub const ENV_PREFIX: &str = "SPRIG_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub source_dir: PathBuf,
    pub static_dir: PathBuf,
    pub output_dir: PathBuf,
    /// First path segment of package namespace URLs.
    pub namespace_root: String,
    pub minify: bool,
    pub bundle: bool,
    /// Limit on concurrently processed files during a build.
    pub concurrency: Option<usize>,
    pub host: String,
    pub port: u16,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("src"),
            static_dir: PathBuf::from("static"),
            output_dir: PathBuf::from("dist"),
            namespace_root: sprig_bundler::namespace::DEFAULT_ROOT.to_string(),
            minify: true,
            bundle: true,
            concurrency: None,
            host: "localhost".to_string(),
            port: 3000,
        }
    }
}

/// Values set on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl ProjectConfig {
    /// Load and validate configuration for a project rooted at `cwd`.
    ///
    /// An explicit `config_path` must exist; the default `sprig.toml` is
    /// optional. Relative directories are resolved against `cwd`.
    pub fn load(
        cwd: &Path,
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => {
                let default_path = cwd.join(CONFIG_FILE);
                default_path.is_file().then_some(default_path)
            }
        };
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides));

        let mut config: Self = figment.extract().map_err(ConfigError::from)?;
        config.source_dir = cwd.join(&config.source_dir).clean();
        config.static_dir = cwd.join(&config.static_dir).clean();
        config.output_dir = cwd.join(&config.output_dir).clean();
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(invalid("port", "0", "Use a port between 1 and 65535"));
        }

        let root = self.namespace_root.trim_matches('/');
        if root.is_empty() || root.contains('/') || root == "." || root == ".." {
            return Err(invalid(
                "namespace_root",
                &self.namespace_root,
                "Use a single path segment such as 'web_modules'",
            ));
        }

        if self.concurrency == Some(0) {
            return Err(invalid(
                "concurrency",
                "0",
                "Use a positive number, or leave unset for no limit",
            ));
        }

        if self.output_dir.starts_with(&self.source_dir) {
            return Err(invalid(
                "output_dir",
                &self.output_dir.display().to_string(),
                "The output directory is cleared on every build and must not be inside source_dir",
            ));
        }

        if self.output_dir == self.static_dir || self.static_dir.starts_with(&self.output_dir) {
            return Err(invalid(
                "output_dir",
                &self.output_dir.display().to_string(),
                "The output directory is cleared on every build and must not contain static_dir",
            ));
        }

        if self.source_dir.starts_with(&self.output_dir) {
            return Err(invalid(
                "output_dir",
                &self.output_dir.display().to_string(),
                "The output directory must not contain source_dir",
            ));
        }

        Ok(())
    }

    pub fn namespace(&self) -> PackageNamespace {
        PackageNamespace::new(&self.namespace_root)
    }

    pub fn build_config(&self) -> BuildConfig {
        BuildConfig::new(&self.source_dir, &self.static_dir, &self.output_dir)
            .minify(self.minify)
            .bundle(self.bundle)
            .concurrency(self.concurrency)
            .mode(Mode::Production)
    }

    pub fn dev_server_config(&self) -> DevServerConfig {
        DevServerConfig {
            host: self.host.clone(),
            port: self.port,
            source_dir: self.source_dir.clone(),
            static_dir: self.static_dir.clone(),
            namespace: self.namespace(),
            bundle: self.bundle,
            mode: Mode::Development,
        }
    }

    pub fn static_server_config(&self, dir: Option<&Path>) -> StaticServerConfig {
        StaticServerConfig {
            host: self.host.clone(),
            port: self.port,
            dir: dir
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.output_dir.clone()),
        }
    }
}

fn invalid(field: &str, value: &str, hint: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        hint: hint.to_string(),
    }
}
