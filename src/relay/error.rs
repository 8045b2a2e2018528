//! Relay error taxonomy.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that end a hop's handling of a request.
///
/// Every variant is local to the hop that raised it: nothing is retried and
/// nothing is routed around. The direct caller sees the status from
/// [`RelayError::status`].
#[derive(Debug, Error)]
pub enum RelayError {
    /// `X-Direction` held something other than `forward` or `return`.
    #[error("Invalid direction state")]
    InvalidDirection(String),

    /// The next or previous hop could not be reached, or timed out.
    #[error("Failed to reach hop at {target}")]
    HopUnreachable {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    /// The generation service could not be reached, or timed out.
    #[error("Failed to reach generation service")]
    GenerationUnreachable {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    /// Terminal forward hop without credentials.
    #[error("Generation service API key not configured on this hop.")]
    MissingApiKey,

    /// The originator could not serialize its summary.
    #[error("Failed to encode summary: {0}")]
    Encode(#[from] serde_json::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::HopUnreachable { .. } | RelayError::GenerationUnreachable { .. } => {
                StatusCode::BAD_GATEWAY
            }
            RelayError::InvalidDirection(_) | RelayError::MissingApiKey | RelayError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Outbound target involved in a transport failure.
    pub fn target(&self) -> Option<&str> {
        match self {
            RelayError::HopUnreachable { target, .. }
            | RelayError::GenerationUnreachable { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            RelayError::HopUnreachable { source, .. }
            | RelayError::GenerationUnreachable { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}
