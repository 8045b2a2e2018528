//! Request/response middleware.

pub mod cors;
