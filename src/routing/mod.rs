//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path
//!     → matcher.rs (bypass? forward untouched)
//!     → classifier.rs (Public / AuthOnly / Protected)
//!     → policy.rs (combine with session identity)
//!     → Return: Allow or a terminal redirect
//! ```
//!
//! # Design Decisions
//! - Markers and targets compiled at startup, immutable at runtime
//! - No regex in hot path (substring, segment and prefix matching only)
//! - Deterministic: same input always yields the same category

pub mod classifier;
pub mod matcher;
pub mod policy;

pub use classifier::{RouteCategory, RouteClassifier};
pub use matcher::{AnyMatcher, ExtensionMatcher, Matcher, PathPrefixMatcher};
pub use policy::{PolicyOutcome, RedirectPolicy};
