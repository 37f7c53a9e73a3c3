//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check locale set consistency (default is supported, codes are well formed)
//! - Validate value ranges and addresses (timeouts > 0, socket addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GateConfig;
use crate::locale::is_locale_shaped;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending configuration field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::Invalid { field, .. } => field,
        }
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_locales(config, &mut errors);
    validate_routes(config, &mut errors);

    let identity = &config.identity;
    if identity.endpoint.trim().is_empty() {
        errors.push(ValidationError::Missing {
            field: "identity.endpoint",
        });
    } else if let Err(e) = identity.endpoint.parse::<url::Url>() {
        errors.push(ValidationError::invalid("identity.endpoint", e.to_string()));
    }
    if identity.timeout_ms == 0 {
        errors.push(ValidationError::invalid(
            "identity.timeout_ms",
            "must be greater than zero",
        ));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::invalid(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.upstream.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::invalid(
            "upstream.address",
            format!("'{}' is not a socket address", config.upstream.address),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::invalid(
            "timeouts.request_secs",
            "must be greater than zero",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_locales(config: &GateConfig, errors: &mut Vec<ValidationError>) {
    let locales = &config.locales;
    if locales.supported.is_empty() {
        errors.push(ValidationError::Missing {
            field: "locales.supported",
        });
    }

    let mut seen = HashSet::new();
    for code in &locales.supported {
        if !is_locale_shaped(code) {
            errors.push(ValidationError::invalid(
                "locales.supported",
                format!("'{}' is not a locale code", code),
            ));
        }
        if !seen.insert(code.as_str()) {
            errors.push(ValidationError::invalid(
                "locales.supported",
                format!("'{}' is listed twice", code),
            ));
        }
    }

    if locales.default_locale.is_empty() {
        errors.push(ValidationError::Missing {
            field: "locales.default_locale",
        });
    } else if !locales.supported.contains(&locales.default_locale) {
        errors.push(ValidationError::invalid(
            "locales.default_locale",
            format!("'{}' is not in locales.supported", locales.default_locale),
        ));
    }

    if let Some(name) = &locales.cookie_name {
        if name.is_empty() || name.contains(|c: char| c == ';' || c == '=' || c.is_whitespace()) {
            errors.push(ValidationError::invalid(
                "locales.cookie_name",
                format!("'{}' is not a valid cookie name", name),
            ));
        }
    }
}

fn validate_routes(config: &GateConfig, errors: &mut Vec<ValidationError>) {
    let routes = &config.routes;
    let paths = [
        ("routes.auth_marker", &routes.auth_marker),
        ("routes.protected_marker", &routes.protected_marker),
        ("routes.login_path", &routes.login_path),
        ("routes.home_path", &routes.home_path),
    ];
    for (field, value) in paths {
        if value.is_empty() {
            errors.push(ValidationError::Missing { field });
        } else if !value.starts_with('/') {
            errors.push(ValidationError::invalid(
                field,
                format!("'{}' must start with '/'", value),
            ));
        }
    }
}
