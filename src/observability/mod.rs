//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http server ── request outcome, status, latency ──┐
//! session refresher ── refresh result, latency ─────┤
//!                                                   ├─→ metrics.rs → Prometheus scrape
//! every stage ── tracing events (request_id, path) ─┴─→ logging.rs → stdout
//! ```
//!
//! # Design Decisions
//! - Outcomes are recorded once, at the transport boundary
//! - Identity failures are warnings; the request itself still succeeds
//! - Paths appear in logs but never in metric labels

pub mod logging;
pub mod metrics;
