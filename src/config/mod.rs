//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → handed to the interceptor and server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no runtime reload
//! - All fields have defaults to allow minimal configs, except the identity endpoint
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GateConfig;
pub use schema::{
    BypassConfig, IdentityConfig, ListenerConfig, LocaleConfig, MatchMode, ObservabilityConfig,
    PrefixStrategy, RoutesConfig, TimeoutConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
