//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::DashboardConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Names a TOML file to load before environment overrides.
pub const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";
pub const PORT_ENV: &str = "PORT";
pub const UPSTREAM_URL_ENV: &str = "COUNTING_SERVICE_URL";
pub const ASSETS_DIR_ENV: &str = "ASSETS_DIR";
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{var} has invalid value '{value}': {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration the way the binary does: optional file named by
/// `DASHBOARD_CONFIG`, then environment overrides, then validation.
pub fn load_from_env() -> Result<DashboardConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Same as [`load_from_env`] with an injectable variable lookup.
pub fn load_with<F>(lookup: F) -> Result<DashboardConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match lookup(CONFIG_PATH_ENV) {
        Some(path) => read_file(Path::new(&path))?,
        None => DashboardConfig::default(),
    };

    let config = apply_env_overrides(base, &lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `PORT`, `COUNTING_SERVICE_URL`, `ASSETS_DIR` and `LOG_LEVEL`.
pub fn apply_env_overrides<F>(mut config: DashboardConfig, lookup: F) -> Result<DashboardConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup(PORT_ENV) {
        config.listener.port = port.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::InvalidEnv {
                var: PORT_ENV,
                value: port.clone(),
                reason: e.to_string(),
            }
        })?;
    }

    if let Some(url) = lookup(UPSTREAM_URL_ENV) {
        config.upstream.url = url;
    }

    if let Some(dir) = lookup(ASSETS_DIR_ENV) {
        config.assets.dir = Some(PathBuf::from(dir));
    }

    if let Some(level) = lookup(LOG_LEVEL_ENV) {
        config.observability.log_level = level;
    }

    Ok(config)
}

fn read_file(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}
