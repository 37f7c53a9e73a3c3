//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Fail fast: any configuration error is fatal
//!
//! Without a config file the defaults are used, with environment overrides applied.

use std::path::Path;

use crate::config::loader::{apply_overrides, load_config};
use crate::config::{validate_config, ConfigError, GateConfig};

/// Load the configuration the process will run with.
pub fn resolve_config(path: Option<&Path>) -> Result<GateConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = apply_overrides(GateConfig::default(), |key| std::env::var(key).ok());
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}
