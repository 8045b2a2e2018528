//! Relay responses and their wire headers.

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::relay::chain::HopChain;
use crate::relay::envelope::{X_HOP_CHAIN, X_HOP_LOG};
use crate::relay::log::HopLog;

/// What a hop hands back to its direct caller.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub chain: HopChain,
    pub log: HopLog,
    pub body: Bytes,
}

impl RelayResponse {
    pub fn new(
        status: StatusCode,
        content_type: impl Into<String>,
        chain: HopChain,
        log: HopLog,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            chain,
            log,
            body: body.into(),
        }
    }
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        let headers = response.headers_mut();

        match HeaderValue::from_str(&self.content_type) {
            Ok(value) => {
                headers.insert(CONTENT_TYPE, value);
            }
            Err(_) => tracing::warn!(content_type = %self.content_type, "Dropping invalid content type"),
        }

        if !self.chain.is_empty() {
            match HeaderValue::from_bytes(self.chain.as_str().as_bytes()) {
                Ok(value) => {
                    headers.insert(X_HOP_CHAIN, value);
                }
                Err(_) => tracing::warn!(chain = %self.chain, "Hop chain is not a valid header value"),
            }
        }

        if let Ok(value) = HeaderValue::from_str(&self.log.encode()) {
            headers.insert(X_HOP_LOG, value);
        }

        response
    }
}
