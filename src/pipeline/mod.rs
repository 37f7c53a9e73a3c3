//! Interception pipeline.
//!
//! # Data Flow
//! ```text
//! GateRequest
//!     → session refresh (identity provider, bounded)
//!     → route classification + redirect policy
//!         ├─ Terminal(redirect) ────────────────┐
//!         └─ Allow → locale resolution          │
//!                      ├─ redirect / not found ─┤
//!                      └─ continue ─────────────┤
//!                                               ▼
//!                          merge(session cookies, stage intent)
//!                                               ▼
//!                                        ResponseIntent
//! ```
//!
//! # Design Decisions
//! - Stages pass immutable intents; one explicit merge at the boundary
//! - The policy redirect pre-empts anything the locale stage would decide
//! - Only the session refresh performs I/O

pub mod intent;
pub mod interceptor;
pub mod merge;

pub use intent::{IntentStatus, ResponseIntent};
pub use interceptor::{Gate, Interception, Interceptor, Outcome, X_LOCALE};
pub use merge::merge;
