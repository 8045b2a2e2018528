//! Network-facing helpers.
//!
//! - origin.rs: best-effort public `scheme://host` of this hop
//! - tls.rs: optional TLS listener configuration

pub mod origin;
pub mod tls;
