//! Locale preference cookie.

use crate::http::cookie::{CookieMutation, SameSite};
use crate::http::GateRequest;

const ONE_YEAR_SECS: i64 = 365 * 24 * 60 * 60;

/// Remembers the resolved locale on the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCookie {
    name: String,
}

impl LocaleCookie {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mutation to emit, if the client's stored value differs from `locale`.
    pub fn mutation_for(&self, request: &GateRequest, locale: &str) -> Option<CookieMutation> {
        if request.cookie(&self.name) == Some(locale) {
            return None;
        }
        Some(
            CookieMutation::new(&self.name, locale)
                .with_path("/")
                .with_max_age(ONE_YEAR_SECS)
                .with_same_site(SameSite::Lax),
        )
    }
}
