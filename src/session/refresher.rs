//! Session refresh with bounded latency.
//!
//! # Responsibilities
//! - Call the identity provider exactly once per request
//! - Enforce the refresh deadline
//! - Degrade any failure to a signed-out session
//!
//! # Design Decisions
//! - Failures never leave this module; they are logged and counted
//! - A failed call forwards no cookies
//! - Dropping the returned future abandons the in-flight call

use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::http::GateRequest;
use crate::observability::metrics;
use crate::session::provider::IdentityProvider;
use crate::session::types::{IdentityError, Session};

pub struct SessionRefresher<P> {
    provider: P,
    timeout_duration: Duration,
}

impl<P: IdentityProvider> SessionRefresher<P> {
    pub fn new(provider: P, timeout_duration: Duration) -> Self {
        Self {
            provider,
            timeout_duration,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn refresh(&self, request: &GateRequest) -> Session {
        let start = Instant::now();
        let call = self.provider.refresh_session(request.cookies());

        let error = match timeout(self.timeout_duration, call).await {
            Ok(Ok(outcome)) => {
                let session = Session::from(outcome);
                let result = if session.is_authenticated() {
                    "authenticated"
                } else {
                    "anonymous"
                };
                metrics::record_identity_refresh(result, start);
                tracing::debug!(
                    authenticated = session.is_authenticated(),
                    cookie_mutations = session.cookie_mutations.len(),
                    "Session refreshed"
                );
                return session;
            }
            Ok(Err(e)) => e,
            Err(_) => IdentityError::timeout(self.timeout_duration),
        };

        let result = match error {
            IdentityError::Timeout(_) => "timeout",
            _ => "error",
        };
        metrics::record_identity_refresh(result, start);
        tracing::warn!(
            error = %error,
            path = %request.path(),
            "Identity provider unavailable, treating request as signed out"
        );
        Session::anonymous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::cookie::{CookieMutation, RequestCookie};
    use crate::session::provider::StaticIdentityProvider;
    use crate::session::types::{Identity, IdentityResult, RefreshOutcome};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingProvider {
        calls: AtomicUsize,
    }

    impl IdentityProvider for FailingProvider {
        async fn refresh_session(&self, _cookies: &[RequestCookie]) -> IdentityResult<RefreshOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(IdentityError::Status(503))
        }
    }

    struct SlowProvider;

    impl IdentityProvider for SlowProvider {
        async fn refresh_session(&self, _cookies: &[RequestCookie]) -> IdentityResult<RefreshOutcome> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(RefreshOutcome {
                identity: Some(Identity::new("late")),
                cookies: vec![CookieMutation::new("late", "1")],
            })
        }
    }

    #[tokio::test]
    async fn test_success_forwards_cookies() {
        let outcome = RefreshOutcome {
            identity: Some(Identity::new("user-1")),
            cookies: vec![CookieMutation::new("sb-access-token", "rotated").with_path("/")],
        };
        let refresher = SessionRefresher::new(
            StaticIdentityProvider::new(outcome.clone()),
            Duration::from_secs(1),
        );

        let session = refresher.refresh(&GateRequest::new("/")).await;
        assert_eq!(session.identity, outcome.identity);
        assert_eq!(session.cookie_mutations, outcome.cookies);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_anonymous() {
        let refresher = SessionRefresher::new(
            FailingProvider {
                calls: AtomicUsize::new(0),
            },
            Duration::from_secs(1),
        );

        let session = refresher.refresh(&GateRequest::new("/dashboard")).await;
        assert_eq!(session, Session::anonymous());
        assert_eq!(refresher.provider().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_degrades_to_anonymous() {
        let refresher = SessionRefresher::new(SlowProvider, Duration::from_millis(20));

        let started = Instant::now();
        let session = refresher.refresh(&GateRequest::new("/dashboard")).await;
        assert_eq!(session, Session::anonymous());
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
