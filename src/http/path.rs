//! Request path canonicalization.
//!
//! # Responsibilities
//! - Percent-decode the raw path exactly once
//! - Collapse empty segments and resolve `.` / `..`
//! - Re-encode canonical paths for the renderer and for `Location` headers
//!
//! # Design Decisions
//! - Every routing decision reads the decoded, canonical form; `/%64ashboard`,
//!   `//dashboard` and `/a/../dashboard` are all `/dashboard`
//! - Canonical paths never start with `//`, so a redirect built from one stays on-site
//! - Trailing slashes are dropped along with other empty segments

use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Bytes escaped when a canonical path leaves the gate. `\` is included because
/// browsers treat `/\host` like `//host`.
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Decode and canonicalize a raw request path.
pub fn canonical_path(raw: &str) -> String {
    normalize_segments(&percent_decode_str(raw).decode_utf8_lossy())
}

/// Collapse empty segments and resolve dot segments. Does not decode.
///
/// `..` above the root is dropped. The result is `/` or `/seg(/seg)*`.
pub fn normalize_segments(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    let mut normalized = String::with_capacity(path.len() + 1);
    for segment in &segments {
        normalized.push('/');
        normalized.push_str(segment);
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}

/// Percent-encode a canonical path for use on the wire.
pub fn encode_path(path: &str) -> Cow<'_, str> {
    utf8_percent_encode(path, PATH_ENCODE_SET).into()
}
