//! Request handling.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Build the immutable request view every pipeline stage reads from
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The view is built once per inbound call and never mutated
//! - The path is decoded and canonicalized on construction; raw paths never reach a decision
//! - Header names are lowercased; repeated `Cookie` headers are concatenated in order

use std::collections::BTreeMap;

use axum::http::{header, HeaderMap, HeaderValue, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::cookie::{parse_cookie_header, RequestCookie};
use crate::http::path::canonical_path;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeGateRequestId;

impl MakeRequestId for MakeGateRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID assigned by the ID layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Immutable view of an inbound page request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateRequest {
    path: String,
    query: Option<String>,
    cookies: Vec<RequestCookie>,
    headers: BTreeMap<String, String>,
}

impl GateRequest {
    /// `raw` is percent-decoded once and canonicalized; see [`canonical_path`].
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self {
            path: canonical_path(raw.as_ref()),
            query: None,
            cookies: Vec::new(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = (!query.is_empty()).then_some(query);
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push(RequestCookie::new(name, value));
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Build the view from transport request parts.
    ///
    /// Non-UTF-8 header values are skipped.
    pub fn from_http(uri: &Uri, headers: &HeaderMap) -> Self {
        let mut request = Self::new(uri.path()).with_query(uri.query().unwrap_or_default());

        for raw in headers.get_all(header::COOKIE) {
            if let Ok(raw) = raw.to_str() {
                request.cookies.extend(parse_cookie_header(raw));
            }
        }

        for (name, value) in headers {
            if *name == header::COOKIE {
                continue;
            }
            if let Ok(value) = value.to_str() {
                request
                    .headers
                    .entry(name.as_str().to_string())
                    .and_modify(|existing| {
                        existing.push_str(", ");
                        existing.push_str(value);
                    })
                    .or_insert_with(|| value.to_string());
            }
        }

        request
    }

    /// Decoded, canonical path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn cookies(&self) -> &[RequestCookie] {
        &self.cookies
    }

    /// First cookie named `name`.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}
