//! Identity types and error definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::cookie::CookieMutation;

/// Reference to the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Identity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }
}

/// What the identity provider returns for one refresh call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RefreshOutcome {
    #[serde(default, rename = "user")]
    pub identity: Option<Identity>,
    /// Token rotations and removals to forward to the client.
    #[serde(default)]
    pub cookies: Vec<CookieMutation>,
}

/// Per-request session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub identity: Option<Identity>,
    pub cookie_mutations: Vec<CookieMutation>,
}

impl Session {
    /// Signed out, nothing to forward.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

impl From<RefreshOutcome> for Session {
    fn from(outcome: RefreshOutcome) -> Self {
        Self {
            identity: outcome.identity,
            cookie_mutations: outcome.cookies,
        }
    }
}

/// Errors that can occur while talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Provider misconfigured (bad endpoint, client build failure).
    #[error("Identity provider configuration error: {0}")]
    Config(String),

    /// Connection or request failed.
    #[error("Identity provider unreachable: {0}")]
    Transport(String),

    /// Request did not complete within the deadline.
    #[error("Identity provider timeout after {0} ms")]
    Timeout(u64),

    /// Provider answered with a non-success status.
    #[error("Identity provider returned status {0}")]
    Status(u16),

    /// Response body was not a valid refresh outcome.
    #[error("Invalid identity provider response: {0}")]
    Decode(String),
}

impl IdentityError {
    /// Timeout for a deadline of `limit`, saturating at `u64::MAX` ms.
    pub fn timeout(limit: Duration) -> Self {
        Self::Timeout(u64::try_from(limit.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
