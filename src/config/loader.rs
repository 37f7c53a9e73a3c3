//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GateConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `identity.endpoint`.
pub const ENV_IDENTITY_ENDPOINT: &str = "EDGE_GATE_IDENTITY_ENDPOINT";

/// Environment variable overriding `identity.api_key`.
pub const ENV_IDENTITY_API_KEY: &str = "EDGE_GATE_IDENTITY_API_KEY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

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
pub fn load_config(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, |key| std::env::var(key).ok())
}

/// Parse TOML, apply overrides from `lookup`, then validate.
pub fn parse_config<F>(content: &str, lookup: F) -> Result<GateConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config: GateConfig = toml::from_str(content)?;
    let config = apply_overrides(config, lookup);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay secrets and deployment-specific values supplied outside the file.
pub fn apply_overrides<F>(mut config: GateConfig, lookup: F) -> GateConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(endpoint) = lookup(ENV_IDENTITY_ENDPOINT).filter(|v| !v.is_empty()) {
        config.identity.endpoint = endpoint;
    }
    if let Some(key) = lookup(ENV_IDENTITY_API_KEY).filter(|v| !v.is_empty()) {
        config.identity.api_key = Some(key);
    }
    config
}
