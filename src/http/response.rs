//! Response rendering.
//!
//! # Responsibilities
//! - Turn terminal intents into redirect / not-found responses
//! - Render every effective cookie mutation as `Set-Cookie`
//! - Copy intent headers onto the outgoing response
//!
//! # Design Decisions
//! - Redirects use 307 so the method is preserved
//! - Cookies are appended after any the renderer set itself
//! - Values that cannot be header values are logged and skipped

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::pipeline::{IntentStatus, ResponseIntent};

/// Response for intents answered without the renderer. `None` for `Continue`.
pub fn terminal(status: &IntentStatus) -> Option<Response> {
    match status {
        IntentStatus::Continue => None,
        IntentStatus::NotFound => Some((StatusCode::NOT_FOUND, "Not Found").into_response()),
        IntentStatus::Redirect(location) => Some(match HeaderValue::from_str(location) {
            Ok(value) => {
                let mut response = StatusCode::TEMPORARY_REDIRECT.into_response();
                response.headers_mut().insert(header::LOCATION, value);
                response
            }
            Err(_) => {
                tracing::error!(location = %location, "Redirect target is not a valid header value");
                (StatusCode::BAD_REQUEST, "Invalid redirect target").into_response()
            }
        }),
    }
}

/// Apply the intent's cookies and headers to a response.
pub fn finish(mut response: Response, intent: &ResponseIntent) -> Response {
    apply_intent(response.headers_mut(), intent);
    response
}

pub fn apply_intent(headers: &mut HeaderMap, intent: &ResponseIntent) {
    for mutation in intent.effective_cookies() {
        match HeaderValue::from_str(&mutation.to_string()) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(_) => {
                tracing::warn!(cookie = %mutation.name, "Skipping cookie that is not a valid header value");
            }
        }
    }
    insert_headers(headers, intent.headers.iter());
}

/// Insert name/value pairs, replacing existing values.
pub fn insert_headers<'a, I>(headers: &mut HeaderMap, pairs: I)
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    for (name, value) in pairs {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping invalid header"),
        }
    }
}
