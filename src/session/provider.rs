//! The identity provider seam.

use std::future::Future;

use crate::http::cookie::RequestCookie;
use crate::session::types::{Identity, IdentityResult, RefreshOutcome};

/// Validates and refreshes a session from request cookies.
///
/// Implementations are called exactly once per intercepted request and must
/// tolerate being dropped mid-call when the client goes away.
pub trait IdentityProvider: Send + Sync {
    fn refresh_session(
        &self,
        cookies: &[RequestCookie],
    ) -> impl Future<Output = IdentityResult<RefreshOutcome>> + Send;
}

/// Provider answering every call with the same outcome.
///
/// Used for offline dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    outcome: RefreshOutcome,
}

impl StaticIdentityProvider {
    pub fn new(outcome: RefreshOutcome) -> Self {
        Self { outcome }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self::new(RefreshOutcome {
            identity: Some(identity),
            cookies: Vec::new(),
        })
    }
}

impl IdentityProvider for StaticIdentityProvider {
    async fn refresh_session(&self, _cookies: &[RequestCookie]) -> IdentityResult<RefreshOutcome> {
        Ok(self.outcome.clone())
    }
}
