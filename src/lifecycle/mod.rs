//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build clients → Bind listener
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     Ctrl+C / SIGTERM → broadcast → stop accepting → drain → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
