//! Session-aware redirect policy.
//!
//! | identity | category  | outcome          |
//! |----------|-----------|------------------|
//! | absent   | Protected | redirect → login |
//! | present  | AuthOnly  | redirect → home  |
//! | *        | *         | allow            |
//!
//! Redirect targets always use the default locale, whatever prefix the request carried.

use serde::Serialize;

use crate::config::GateConfig;
use crate::locale::prefixed_path;
use crate::routing::classifier::RouteCategory;
use crate::session::Identity;

/// Decision of [`RedirectPolicy::decide`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum PolicyOutcome {
    Allow,
    RedirectToLogin(String),
    RedirectToHome(String),
}

impl PolicyOutcome {
    pub fn location(&self) -> Option<&str> {
        match self {
            PolicyOutcome::Allow => None,
            PolicyOutcome::RedirectToLogin(l) | PolicyOutcome::RedirectToHome(l) => Some(l),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RedirectPolicy {
    login_target: String,
    home_target: String,
}

impl RedirectPolicy {
    pub fn new(default_locale: &str, login_path: &str, home_path: &str) -> Self {
        Self {
            login_target: prefixed_path(default_locale, login_path),
            home_target: prefixed_path(default_locale, home_path),
        }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(
            &config.locales.default_locale,
            &config.routes.login_path,
            &config.routes.home_path,
        )
    }

    pub fn login_target(&self) -> &str {
        &self.login_target
    }

    pub fn home_target(&self) -> &str {
        &self.home_target
    }

    pub fn decide(&self, identity: Option<&Identity>, category: RouteCategory) -> PolicyOutcome {
        match (identity, category) {
            (None, RouteCategory::Protected) => {
                PolicyOutcome::RedirectToLogin(self.login_target.clone())
            }
            (Some(_), RouteCategory::AuthOnly) => {
                PolicyOutcome::RedirectToHome(self.home_target.clone())
            }
            _ => PolicyOutcome::Allow,
        }
    }
}
