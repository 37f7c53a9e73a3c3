//! Locale subsystem.
//!
//! # Data Flow
//! ```text
//! request path
//!     → resolver.rs (prefix detection, canonical form)
//!     → LocaleDecision { resolved locale, internal path, redirect? }
//!     → cookie.rs (remember the resolved locale on the client)
//! ```
//!
//! # Design Decisions
//! - Locale set and default are fixed at startup
//! - Redirect targets are computed here but only applied when the session stage allows the request

pub mod cookie;
pub mod resolver;

pub use cookie::LocaleCookie;
pub use resolver::{LocaleDecision, LocaleResolution, LocaleResolver};

/// `ll` or `ll-RR`: two lowercase ASCII letters, optionally a region of two uppercase letters.
pub fn is_locale_shaped(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    let language = |b: &[u8]| b.len() == 2 && b.iter().all(u8::is_ascii_lowercase);
    match bytes.len() {
        2 => language(bytes),
        5 => {
            language(&bytes[..2])
                && bytes[2] == b'-'
                && bytes[3..].iter().all(u8::is_ascii_uppercase)
        }
        _ => false,
    }
}

/// Join a locale prefix and a path: (`ru`, `/about`) → `/ru/about`, (`ru`, `/`) → `/ru`.
pub fn prefixed_path(locale: &str, path: &str) -> String {
    if path.is_empty() || path == "/" {
        format!("/{}", locale)
    } else if path.starts_with('/') {
        format!("/{}{}", locale, path)
    } else {
        format!("/{}/{}", locale, path)
    }
}
