//! The single response produced per intercepted request.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::http::cookie::CookieMutation;

/// What the transport should do with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum IntentStatus {
    /// Pass the request on to the page renderer.
    Continue,
    /// Send the client elsewhere.
    Redirect(String),
    /// The path has no page (unsupported locale prefix).
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseIntent {
    pub status: IntentStatus,
    /// In production order; nothing is ever removed.
    pub cookie_mutations: Vec<CookieMutation>,
    pub headers: BTreeMap<String, String>,
}

impl ResponseIntent {
    fn with_status(status: IntentStatus) -> Self {
        Self {
            status,
            cookie_mutations: Vec::new(),
            headers: BTreeMap::new(),
        }
    }

    pub fn proceed() -> Self {
        Self::with_status(IntentStatus::Continue)
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self::with_status(IntentStatus::Redirect(location.into()))
    }

    pub fn not_found() -> Self {
        Self::with_status(IntentStatus::NotFound)
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_cookie(mut self, mutation: CookieMutation) -> Self {
        self.cookie_mutations.push(mutation);
        self
    }

    pub fn location(&self) -> Option<&str> {
        match &self.status {
            IntentStatus::Redirect(location) => Some(location),
            _ => None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        self.location().is_some()
    }

    /// Mutations as a cookie jar would end up applying them.
    ///
    /// Each (name, path, domain) appears once, at the position of its last
    /// mutation and with that mutation's value and attributes.
    pub fn effective_cookies(&self) -> Vec<&CookieMutation> {
        self.cookie_mutations
            .iter()
            .enumerate()
            .filter(|(i, mutation)| {
                !self.cookie_mutations[i + 1..]
                    .iter()
                    .any(|later| later.key() == mutation.key())
            })
            .map(|(_, mutation)| mutation)
            .collect()
    }
}
