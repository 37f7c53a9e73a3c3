//! Cookies read from requests and `Set-Cookie` intentions written to responses.
//!
//! # Design Decisions
//! - Request cookies keep the order the client sent them in
//! - A mutation with `Max-Age <= 0` removes the cookie
//! - Mutations are identified by (name, path, domain), matching cookie-jar semantics

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cookie as sent by the client in the `Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RequestCookie {
    pub name: String,
    pub value: String,
}

impl RequestCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// `SameSite` attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    #[serde(alias = "Strict")]
    Strict,
    #[serde(alias = "Lax")]
    Lax,
    #[serde(alias = "None")]
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes carried by a `Set-Cookie` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CookieAttributes {
    pub path: Option<String>,
    pub domain: Option<String>,
    /// Lifetime in seconds.
    pub max_age: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: Option<SameSite>,
}

/// A single `Set-Cookie` intention.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CookieMutation {
    pub name: String,
    pub value: String,
    #[serde(default, alias = "options")]
    pub attributes: CookieAttributes,
}

impl CookieMutation {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            attributes: CookieAttributes::default(),
        }
    }

    /// A mutation that deletes `name` on the client.
    pub fn removal(name: impl Into<String>) -> Self {
        Self::new(name, "").with_path("/").with_max_age(0)
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.attributes.path = Some(path.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.attributes.domain = Some(domain.into());
        self
    }

    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.attributes.max_age = Some(seconds);
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.attributes.same_site = Some(same_site);
        self
    }

    pub fn http_only(mut self) -> Self {
        self.attributes.http_only = true;
        self
    }

    pub fn secure(mut self) -> Self {
        self.attributes.secure = true;
        self
    }

    /// RFC 6265 path-match. Without a `Path` attribute the cookie is scoped to
    /// the request that set it, so it matches.
    pub fn path_matches(&self, request_path: &str) -> bool {
        let Some(path) = self.attributes.path.as_deref() else {
            return true;
        };
        match request_path.strip_prefix(path) {
            Some(rest) => rest.is_empty() || path.ends_with('/') || rest.starts_with('/'),
            None => false,
        }
    }

    pub fn is_removal(&self) -> bool {
        matches!(self.attributes.max_age, Some(age) if age <= 0)
    }

    /// Two mutations with the same key target the same client-side cookie.
    pub fn key(&self) -> (&str, Option<&str>, Option<&str>) {
        (
            &self.name,
            self.attributes.path.as_deref(),
            self.attributes.domain.as_deref(),
        )
    }
}

impl fmt::Display for CookieMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        let attrs = &self.attributes;
        if let Some(path) = &attrs.path {
            write!(f, "; Path={}", path)?;
        }
        if let Some(domain) = &attrs.domain {
            write!(f, "; Domain={}", domain)?;
        }
        if let Some(max_age) = attrs.max_age {
            write!(f, "; Max-Age={}", max_age.max(0))?;
        }
        if attrs.http_only {
            write!(f, "; HttpOnly")?;
        }
        if attrs.secure {
            write!(f, "; Secure")?;
        }
        if let Some(same_site) = attrs.same_site {
            write!(f, "; SameSite={}", same_site.as_str())?;
        }
        Ok(())
    }
}

/// Parse a `Cookie` request header into ordered name/value pairs.
///
/// Pairs without `=` or with an empty name are skipped.
pub fn parse_cookie_header(raw: &str) -> Vec<RequestCookie> {
    raw.split(';')
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            let value = parts.next()?.trim();
            if name.is_empty() {
                return None;
            }
            Some(RequestCookie::new(name, value))
        })
        .collect()
}

/// Render request cookies back into a `Cookie` header value.
pub fn render_cookie_header(cookies: &[RequestCookie]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// The cookies the next hop should see for `request_path` once `mutations` have been applied.
///
/// Only mutations whose `Path` covers `request_path` take part, as a browser would
/// only send those. `Domain` is not checked: the gate serves a single host.
/// Updated cookies keep their position, new ones are appended, removals drop out.
pub fn apply_mutations(
    cookies: &[RequestCookie],
    mutations: &[CookieMutation],
    request_path: &str,
) -> Vec<RequestCookie> {
    let mut result = cookies.to_vec();
    for mutation in mutations.iter().filter(|m| m.path_matches(request_path)) {
        if mutation.is_removal() {
            result.retain(|c| c.name != mutation.name);
            continue;
        }
        match result.iter_mut().find(|c| c.name == mutation.name) {
            Some(existing) => existing.value = mutation.value.clone(),
            None => result.push(RequestCookie::new(&mutation.name, &mutation.value)),
        }
    }
    result
}
