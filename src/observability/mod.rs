//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay handler produces:
//!     → logging.rs (one structured event per hop visit, errors on failures)
//!     → metrics.rs (request counters, durations, outbound failures)
//!
//! Consumers:
//!     → stdout (text or JSON lines)
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the whole chain via `x-request-id`
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
