//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Supported locales and prefix strategy.
    pub locales: LocaleConfig,

    /// Route markers and redirect targets.
    pub routes: RoutesConfig,

    /// Identity provider used to refresh sessions.
    pub identity: IdentityConfig,

    /// Page renderer that receives allowed requests.
    pub upstream: UpstreamConfig,

    /// Requests that skip interception entirely.
    pub bypass: BypassConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// How locale prefixes appear in canonical URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrefixStrategy {
    /// Every URL carries a locale prefix.
    Always,
    /// The default locale is served without a prefix, all others with one.
    #[default]
    AsNeeded,
    /// URLs never carry a prefix.
    Never,
}

/// Locale configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Locale codes served by the application.
    pub supported: Vec<String>,

    /// Locale used when the path carries no prefix.
    pub default_locale: String,

    pub prefix_strategy: PrefixStrategy,

    /// Cookie remembering the last resolved locale. `None` disables it.
    pub cookie_name: Option<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            supported: vec!["ru".to_string(), "kk".to_string(), "en".to_string()],
            default_locale: "ru".to_string(),
            prefix_strategy: PrefixStrategy::AsNeeded,
            cookie_name: Some("NEXT_LOCALE".to_string()),
        }
    }
}

/// How route markers are compared against a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Marker text anywhere in the path.
    #[default]
    Substring,
    /// Marker segments appear as whole path segments.
    Segment,
}

/// Route classification and redirect targets.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Marker for pages only meaningful to signed-out users (login, signup).
    pub auth_marker: String,

    /// Marker for pages that require a session.
    pub protected_marker: String,

    pub match_mode: MatchMode,

    /// Login page, without locale prefix.
    pub login_path: String,

    /// Landing page for signed-in users, without locale prefix.
    pub home_path: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            auth_marker: "/auth".to_string(),
            protected_marker: "/dashboard".to_string(),
            match_mode: MatchMode::Substring,
            login_path: "/auth/login".to_string(),
            home_path: "/dashboard".to_string(),
        }
    }
}

/// Identity provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Session refresh endpoint URL. Required.
    pub endpoint: String,

    /// API key sent as `apikey` and bearer token.
    pub api_key: Option<String>,

    /// Upper bound for one refresh call in milliseconds.
    pub timeout_ms: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            timeout_ms: 2000,
        }
    }
}

/// Upstream page renderer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Renderer address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Paths forwarded upstream without interception (assets, API routes).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BypassConfig {
    pub path_prefixes: Vec<String>,
    /// File extensions without the leading dot.
    pub extensions: Vec<String>,
}

impl Default for BypassConfig {
    fn default() -> Self {
        Self {
            path_prefixes: ["/_next", "/api", "/static"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            extensions: [
                "ico", "png", "jpg", "jpeg", "svg", "gif", "webp", "css", "js", "map", "txt",
                "xml",
            ]
            .iter()
            .map(|e| e.to_string())
            .collect(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
