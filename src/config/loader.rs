//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::DataplaneConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_SERVER: &str = "HAPROXY_SERVER";
pub const ENV_USERNAME: &str = "HAPROXY_USERNAME";
pub const ENV_PASSWORD: &str = "HAPROXY_PASSWORD";
pub const ENV_INSECURE: &str = "HAPROXY_INSECURE";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: {value:?}")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file, apply environment overrides, validate.
pub fn load_config(path: &Path) -> Result<DataplaneConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: DataplaneConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build configuration from defaults and the `HAPROXY_*` environment variables.
pub fn load_from_env() -> Result<DataplaneConfig, ConfigError> {
    let mut config = DataplaneConfig::default();

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay server settings found through `lookup` onto `config`.
pub fn apply_env_overrides<F>(config: &mut DataplaneConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(address) = lookup(ENV_SERVER) {
        config.server.address = address;
    }
    if let Some(username) = lookup(ENV_USERNAME) {
        config.server.username = username;
    }
    if let Some(password) = lookup(ENV_PASSWORD) {
        config.server.password = password;
    }
    if let Some(raw) = lookup(ENV_INSECURE) {
        config.server.insecure = match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => {
                return Err(ConfigError::Env {
                    name: ENV_INSECURE,
                    value: raw,
                })
            }
        };
    }
    Ok(())
}
