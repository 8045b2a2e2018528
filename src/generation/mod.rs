//! Generation service integration.
//!
//! # Data Flow
//! ```text
//! terminal forward hop body
//!     → payload.rs (messages, model, passthrough params)
//!     → client.rs (one POST to the chat-completions endpoint)
//!     → raw service reply, relayed back untouched
//! ```

pub mod client;
pub mod payload;

pub use client::{Completion, GenerationClient};
pub use payload::{ChatMessage, GenerationRequest};
