//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, bypass check)
//!     → request.rs (request ID, immutable GateRequest view)
//!     → path.rs (percent-decode, collapse `//`, `.` and `..`)
//!     → [pipeline decides: continue, redirect, not found]
//!     → server.rs (forward to renderer with refreshed cookies) on continue
//!     → response.rs (status, Location, Set-Cookie)
//!     → Send to client
//! ```

pub mod cookie;
pub mod path;
pub mod request;
pub mod response;
pub mod server;

pub use cookie::{CookieAttributes, CookieMutation, RequestCookie, SameSite};
pub use path::{canonical_path, encode_path, normalize_segments};
pub use request::{request_id, GateRequest, MakeGateRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
