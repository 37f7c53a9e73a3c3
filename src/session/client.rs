//! Identity provider HTTP client with timeout and error handling.
//!
//! # Responsibilities
//! - POST the request's cookies to the session refresh endpoint
//! - Decode the signed-in user and any rotated cookies
//! - Map transport, status and decode failures to [`IdentityError`]
//!
//! # Wire Format
//! ```text
//! → POST {endpoint}   {"cookies": [{"name": "...", "value": "..."}]}
//! ← 200               {"user": {"id": "...", "email": "..."} | null,
//!                      "cookies": [{"name", "value", "options": {...}}]}
//! ```

use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::config::IdentityConfig;
use crate::http::cookie::RequestCookie;
use crate::session::provider::IdentityProvider;
use crate::session::types::{IdentityError, IdentityResult, RefreshOutcome};

#[derive(Serialize)]
struct RefreshRequest<'a> {
    cookies: &'a [RequestCookie],
}

/// Identity provider reached over HTTP.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    timeout_duration: Duration,
}

impl HttpIdentityProvider {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `config` - Identity provider configuration
    ///
    /// # Returns
    /// A new client or error if the endpoint is invalid
    pub fn new(config: &IdentityConfig) -> IdentityResult<Self> {
        let endpoint: Url = config.endpoint.parse().map_err(|e| {
            IdentityError::Config(format!(
                "Invalid identity endpoint '{}': {}",
                config.endpoint, e
            ))
        })?;
        let timeout_duration = Duration::from_millis(config.timeout_ms);

        let client = reqwest::Client::builder()
            .timeout(timeout_duration)
            .build()
            .map_err(|e| IdentityError::Config(e.to_string()))?;

        tracing::info!(
            endpoint = %endpoint,
            timeout_ms = config.timeout_ms,
            "Identity provider client initialized"
        );

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            timeout_duration,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn map_transport_error(&self, e: reqwest::Error) -> IdentityError {
        if e.is_timeout() {
            IdentityError::timeout(self.timeout_duration)
        } else if e.is_decode() {
            IdentityError::Decode(e.to_string())
        } else {
            IdentityError::Transport(e.to_string())
        }
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn refresh_session(&self, cookies: &[RequestCookie]) -> IdentityResult<RefreshOutcome> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&RefreshRequest { cookies });
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Status(status.as_u16()));
        }

        response
            .json::<RefreshOutcome>()
            .await
            .map_err(|e| self.map_transport_error(e))
    }
}
