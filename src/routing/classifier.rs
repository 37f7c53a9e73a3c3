//! Route classification.
//!
//! # Responsibilities
//! - Map a path to its access category using two configured markers
//!
//! # Design Decisions
//! - Substring matching by default: `/blog/dashboard-tips` counts as protected
//! - Segment matching compares whole path segments and is opt-in
//! - A path carrying both markers is protected

use serde::Serialize;

use crate::config::{MatchMode, RoutesConfig};

/// Access category of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteCategory {
    Public,
    /// Only meaningful without a session (login, signup).
    AuthOnly,
    /// Requires a session.
    Protected,
}

/// Classifies paths by marker.
#[derive(Debug, Clone)]
pub struct RouteClassifier {
    auth_marker: String,
    protected_marker: String,
    mode: MatchMode,
}

impl RouteClassifier {
    pub fn new(
        auth_marker: impl Into<String>,
        protected_marker: impl Into<String>,
        mode: MatchMode,
    ) -> Self {
        Self {
            auth_marker: auth_marker.into(),
            protected_marker: protected_marker.into(),
            mode,
        }
    }

    pub fn from_config(config: &RoutesConfig) -> Self {
        Self::new(
            config.auth_marker.clone(),
            config.protected_marker.clone(),
            config.match_mode,
        )
    }

    pub fn classify(&self, path: &str) -> RouteCategory {
        if self.matches(path, &self.protected_marker) {
            RouteCategory::Protected
        } else if self.matches(path, &self.auth_marker) {
            RouteCategory::AuthOnly
        } else {
            RouteCategory::Public
        }
    }

    fn matches(&self, path: &str, marker: &str) -> bool {
        match self.mode {
            MatchMode::Substring => path.contains(marker),
            MatchMode::Segment => contains_segments(path, marker),
        }
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// True if the marker's segments occur as a contiguous run of the path's segments.
fn contains_segments(path: &str, marker: &str) -> bool {
    let needle = segments(marker);
    if needle.is_empty() {
        return false;
    }
    segments(path)
        .windows(needle.len())
        .any(|window| window == needle.as_slice())
}
