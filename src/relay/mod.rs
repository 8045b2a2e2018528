//! Hop relay protocol.
//!
//! # Data Flow
//! ```text
//! inbound POST
//!     → envelope.rs (X-Direction, X-Hop-Chain, X-Hop-Log, body)
//!     → handler.rs (append chain entry + log record, dispatch on direction)
//!         forward, next hop set    → client.rs → next hop
//!         forward, terminal        → generation service → previous hop / caller
//!         return, previous hop set → client.rs → previous hop
//!         return, originator       → summary.rs
//!     → response.rs (status, body, chain/log headers)
//! ```
//!
//! # Design Decisions
//! - Every hop is a pure function of one request plus static config
//! - Chain and log only ever grow; there is no hop cap or cycle detection
//! - Failures are hop-local: no retries, no routing around a dead neighbour

pub mod chain;
pub mod client;
pub mod direction;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod log;
pub mod response;
pub mod summary;

pub use chain::HopChain;
pub use direction::Direction;
pub use envelope::{Envelope, HopVisit};
pub use error::RelayError;
pub use handler::HopRelay;
pub use log::{HopLog, HopRecord};
pub use response::RelayResponse;
pub use summary::Summary;
