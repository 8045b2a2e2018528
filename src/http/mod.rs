//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID: generate or keep caller's)
//!     → middleware/cors.rs (preflight + CORS headers on every response)
//!     → relay handler (crate::relay)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
