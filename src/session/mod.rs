//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! request cookies
//!     → refresher.rs (deadline, failure → signed out)
//!     → provider.rs (IdentityProvider seam)
//!     → client.rs (HTTP call to the identity provider)
//!     → Session { identity?, cookie mutations }
//! ```
//!
//! # Design Decisions
//! - The provider owns session persistence; nothing is stored here
//! - Rotated tokens surface as cookie mutations that always reach the client
//! - Provider outages degrade navigation to signed out, never to an error page

pub mod client;
pub mod provider;
pub mod refresher;
pub mod types;

pub use client::HttpIdentityProvider;
pub use provider::{IdentityProvider, StaticIdentityProvider};
pub use refresher::SessionRefresher;
pub use types::{Identity, IdentityError, IdentityResult, RefreshOutcome, Session};
