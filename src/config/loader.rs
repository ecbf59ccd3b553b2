//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ProxyConfig, PRIMARY_PROFILE, SECONDARY_PROFILE};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables recognised by [`apply_env_overrides`].
pub const ENV_UPSTREAM_API_BASE: &str = "UPSTREAM_API_BASE";
pub const ENV_UPSTREAM_API_BASE2: &str = "UPSTREAM_API_BASE2";
pub const ENV_UPSTREAM_TIMEOUT: &str = "UPSTREAM_TIMEOUT";
pub const ENV_UPSTREAM_CONNECT_TIMEOUT: &str = "UPSTREAM_CONNECT_TIMEOUT";
pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{var}=`{value}` is not a number of seconds")]
    InvalidEnv { var: &'static str, value: String },

    #[error("{var} is set but no `{profile}` profile is configured")]
    MissingProfile {
        var: &'static str,
        profile: &'static str,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build the effective configuration: defaults, then the optional file,
/// then the process environment, then an explicit bind address.
pub fn load_layered(
    path: Option<&Path>,
    bind_override: Option<String>,
) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;

    if let Some(bind) = bind_override {
        config.listener.bind_address = bind;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts the environment so tests never touch process state.
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    for (var, profile) in [
        (ENV_UPSTREAM_API_BASE, PRIMARY_PROFILE),
        (ENV_UPSTREAM_API_BASE2, SECONDARY_PROFILE),
    ] {
        if let Some(base) = get(var) {
            let target = config
                .profile_mut(profile)
                .ok_or(ConfigError::MissingProfile { var, profile })?;
            target.base_url = base.trim().to_string();
        }
    }

    if let Some(raw) = get(ENV_UPSTREAM_TIMEOUT) {
        config.upstream.timeout_secs = parse_secs(ENV_UPSTREAM_TIMEOUT, &raw)?;
    }
    if let Some(raw) = get(ENV_UPSTREAM_CONNECT_TIMEOUT) {
        config.upstream.connect_timeout_secs = parse_secs(ENV_UPSTREAM_CONNECT_TIMEOUT, &raw)?;
    }
    // The key may legitimately be cleared by an empty value.
    if let Some(key) = lookup(ENV_API_KEY) {
        config.upstream.api_key = key.trim().to_string();
    }
    if let Some(bind) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = bind;
    }

    Ok(())
}

fn parse_secs(var: &'static str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: raw.to_string(),
    })
}
