//! Two-phase request interception.
//!
//! Phase 1 refreshes the session and applies the redirect policy, yielding a
//! [`Gate`]. Only [`Gate::Allow`] reaches phase 2, locale resolution. Whichever
//! phase terminates hands its intent to [`merge`] together with the session's
//! cookie mutations, so at most one redirect survives and no session cookie is lost.

use std::time::Duration;

use serde::Serialize;

use crate::config::GateConfig;
use crate::http::{encode_path, GateRequest};
use crate::locale::{LocaleCookie, LocaleDecision, LocaleResolution, LocaleResolver};
use crate::pipeline::intent::ResponseIntent;
use crate::pipeline::merge::merge;
use crate::routing::{PolicyOutcome, RedirectPolicy, RouteCategory, RouteClassifier};
use crate::session::{IdentityProvider, Session, SessionRefresher};

/// Header telling the renderer which message catalog to load.
pub const X_LOCALE: &str = "x-locale";

/// Which stage decided the response, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Continue,
    LoginRedirect,
    HomeRedirect,
    LocaleRedirect,
    NotFound,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Continue => "continue",
            Outcome::LoginRedirect => "login_redirect",
            Outcome::HomeRedirect => "home_redirect",
            Outcome::LocaleRedirect => "locale_redirect",
            Outcome::NotFound => "not_found",
        }
    }
}

/// Result of phase 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Allow,
    /// Skips locale resolution entirely.
    Terminal(Outcome, ResponseIntent),
}

impl From<PolicyOutcome> for Gate {
    fn from(outcome: PolicyOutcome) -> Self {
        match outcome {
            PolicyOutcome::Allow => Gate::Allow,
            PolicyOutcome::RedirectToLogin(location) => {
                Gate::Terminal(Outcome::LoginRedirect, ResponseIntent::redirect(location))
            }
            PolicyOutcome::RedirectToHome(location) => {
                Gate::Terminal(Outcome::HomeRedirect, ResponseIntent::redirect(location))
            }
        }
    }
}

/// Everything the transport needs to answer one request.
#[derive(Debug, Clone, Serialize)]
pub struct Interception {
    pub outcome: Outcome,
    pub category: RouteCategory,
    /// Final, merged response.
    pub intent: ResponseIntent,
    pub session: Session,
    /// Present when phase 2 ran and the locale was recognized.
    pub locale: Option<LocaleDecision>,
}

impl Interception {
    /// Path the renderer should be asked for, when the request continues.
    pub fn upstream_path(&self) -> Option<&str> {
        match self.outcome {
            Outcome::Continue => self.locale.as_ref().map(|d| d.rewritten_path.as_str()),
            _ => None,
        }
    }
}

/// The edge request interceptor.
pub struct Interceptor<P> {
    refresher: SessionRefresher<P>,
    classifier: RouteClassifier,
    policy: RedirectPolicy,
    resolver: LocaleResolver,
    locale_cookie: Option<LocaleCookie>,
}

impl<P: IdentityProvider> Interceptor<P> {
    pub fn new(config: &GateConfig, provider: P) -> Self {
        Self {
            refresher: SessionRefresher::new(
                provider,
                Duration::from_millis(config.identity.timeout_ms),
            ),
            classifier: RouteClassifier::from_config(&config.routes),
            policy: RedirectPolicy::from_config(config),
            resolver: LocaleResolver::from_config(&config.locales),
            locale_cookie: config.locales.cookie_name.as_deref().map(LocaleCookie::new),
        }
    }

    pub fn resolver(&self) -> &LocaleResolver {
        &self.resolver
    }

    pub fn classifier(&self) -> &RouteClassifier {
        &self.classifier
    }

    pub fn provider(&self) -> &P {
        self.refresher.provider()
    }

    /// Run the whole pipeline for one request.
    pub async fn handle(&self, request: &GateRequest) -> Interception {
        let session = self.refresher.refresh(request).await;
        self.evaluate(request, session)
    }

    /// Everything after the session refresh. Pure.
    pub fn evaluate(&self, request: &GateRequest, session: Session) -> Interception {
        let category = self.classifier.classify(request.path());

        let (outcome, stage, locale) = match self.gate(&session, category) {
            Gate::Terminal(outcome, intent) => (outcome, intent, None),
            Gate::Allow => self.localize(request),
        };

        tracing::debug!(
            path = %request.path(),
            category = ?category,
            authenticated = session.is_authenticated(),
            outcome = outcome.as_str(),
            location = ?stage.location(),
            "Request intercepted"
        );

        let intent = merge(&session.cookie_mutations, stage);
        Interception {
            outcome,
            category,
            intent,
            session,
            locale,
        }
    }

    pub fn gate(&self, session: &Session, category: RouteCategory) -> Gate {
        Gate::from(self.policy.decide(session.identity.as_ref(), category))
    }

    fn localize(&self, request: &GateRequest) -> (Outcome, ResponseIntent, Option<LocaleDecision>) {
        let decision = match self.resolver.resolve(request.path()) {
            LocaleResolution::Resolved(decision) => decision,
            LocaleResolution::NotFound { segment } => {
                tracing::debug!(path = %request.path(), segment = %segment, "Unsupported locale prefix");
                return (Outcome::NotFound, ResponseIntent::not_found(), None);
            }
        };

        if let Some(target) = &decision.redirect {
            let target = encode_path(target);
            let location = match request.query() {
                Some(query) => format!("{}?{}", target, query),
                None => target.into_owned(),
            };
            return (
                Outcome::LocaleRedirect,
                ResponseIntent::redirect(location),
                Some(decision),
            );
        }

        let mut intent = ResponseIntent::proceed().with_header(X_LOCALE, &decision.resolved_locale);
        if let Some(mutation) = self
            .locale_cookie
            .as_ref()
            .and_then(|c| c.mutation_for(request, &decision.resolved_locale))
        {
            intent = intent.with_cookie(mutation);
        }
        (Outcome::Continue, intent, Some(decision))
    }
}
