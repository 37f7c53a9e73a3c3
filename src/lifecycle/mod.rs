//! Process lifecycle.
//!
//! # Data Flow
//! ```text
//! startup.rs:  --config / defaults → env overrides → validate (all errors at once)
//! signals.rs:  SIGINT / SIGTERM → Shutdown::trigger
//! shutdown.rs: ShutdownSignal → axum graceful shutdown → in-flight requests drain
//! ```
//!
//! # Design Decisions
//! - A bad configuration stops the process before the listener is bound
//! - Nothing is reloaded at runtime; a new configuration means a restart

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
