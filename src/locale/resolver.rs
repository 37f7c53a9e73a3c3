//! Locale prefix resolution.
//!
//! # Responsibilities
//! - Detect a locale prefix on the first path segment
//! - Decide the resolved locale and the internal (always prefixed) path
//! - Decide whether the URL must be redirected to its canonical form
//!
//! # Design Decisions
//! - Pure and deterministic; resolving the same path twice yields the same decision
//! - Unknown locale-shaped prefixes are a routing miss, never a silent fallback
//! - Supported codes are compared exactly (case-sensitive)

use serde::Serialize;

use crate::config::{LocaleConfig, PrefixStrategy};
use crate::http::path::normalize_segments;
use crate::locale::{is_locale_shaped, prefixed_path};

/// Outcome of resolving a path with a recognized or absent prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleDecision {
    pub resolved_locale: String,
    pub default_locale: String,
    /// Locale-prefixed path handed to the renderer.
    pub rewritten_path: String,
    /// Canonical URL the client must be sent to, if the request is not already on it.
    pub redirect: Option<String>,
}

impl LocaleDecision {
    pub fn redirect_required(&self) -> bool {
        self.redirect.is_some()
    }
}

/// Result of [`LocaleResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocaleResolution {
    Resolved(LocaleDecision),
    /// First segment looks like a locale code but is not supported.
    NotFound { segment: String },
}

/// Resolves locale prefixes against a fixed locale set.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    supported: Vec<String>,
    default_locale: String,
    strategy: PrefixStrategy,
}

impl LocaleResolver {
    pub fn new(
        supported: Vec<String>,
        default_locale: impl Into<String>,
        strategy: PrefixStrategy,
    ) -> Self {
        Self {
            supported,
            default_locale: default_locale.into(),
            strategy,
        }
    }

    pub fn from_config(config: &LocaleConfig) -> Self {
        Self::new(
            config.supported.clone(),
            config.default_locale.clone(),
            config.prefix_strategy,
        )
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn supported(&self) -> &[String] {
        &self.supported
    }

    pub fn strategy(&self) -> PrefixStrategy {
        self.strategy
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.supported.iter().any(|s| s == code)
    }

    /// Resolve an already-decoded path.
    ///
    /// Empty and dot segments are collapsed first, so a redirect target never
    /// starts with `//`.
    pub fn resolve(&self, path: &str) -> LocaleResolution {
        let path = normalize_segments(path);
        match split_first_segment(&path) {
            (Some(segment), rest) if self.is_supported(segment) => {
                LocaleResolution::Resolved(self.resolve_prefixed(&path, segment, rest))
            }
            (Some(segment), _) if is_locale_shaped(segment) => LocaleResolution::NotFound {
                segment: segment.to_string(),
            },
            _ => LocaleResolution::Resolved(self.resolve_bare(&path)),
        }
    }

    fn resolve_prefixed(&self, path: &str, locale: &str, rest: &str) -> LocaleDecision {
        let canonical_without_prefix = match self.strategy {
            PrefixStrategy::AsNeeded => locale == self.default_locale,
            PrefixStrategy::Never => true,
            PrefixStrategy::Always => false,
        };

        LocaleDecision {
            resolved_locale: locale.to_string(),
            default_locale: self.default_locale.clone(),
            rewritten_path: path.to_string(),
            redirect: canonical_without_prefix.then(|| rest.to_string()),
        }
    }

    fn resolve_bare(&self, path: &str) -> LocaleDecision {
        let internal = prefixed_path(&self.default_locale, path);
        let redirect = match self.strategy {
            PrefixStrategy::Always => Some(internal.clone()),
            PrefixStrategy::AsNeeded | PrefixStrategy::Never => None,
        };

        LocaleDecision {
            resolved_locale: self.default_locale.clone(),
            default_locale: self.default_locale.clone(),
            rewritten_path: internal,
            redirect,
        }
    }
}

/// Split `/kk/dashboard` into (`kk`, `/dashboard`). A lone prefix leaves `/`.
fn split_first_segment(path: &str) -> (Option<&str>, &str) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return (None, "/");
    }
    match trimmed.find('/') {
        Some(idx) => (Some(&trimmed[..idx]), &trimmed[idx..]),
        None => (Some(trimmed), "/"),
    }
}
