//! Stateless hop relay.
//!
//! Every deployment runs the same handler; only configuration decides
//! whether a hop is the originator, a middle hop, or the terminal hop that
//! talks to the generation service.

pub mod config;
pub mod generation;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
