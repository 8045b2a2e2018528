//! Outbound calls to neighbouring hops.

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;
use std::time::Duration;

use crate::relay::chain::HopChain;
use crate::relay::direction::Direction;
use crate::relay::envelope::{HopVisit, TEXT_PLAIN, X_DIRECTION, X_HOP_CHAIN, X_HOP_LOG, X_REQUEST_ID};
use crate::relay::error::RelayError;
use crate::relay::log::HopLog;
use crate::relay::response::RelayResponse;

/// One outbound relay call.
#[derive(Debug)]
pub struct RelayRequest<'a> {
    pub target: &'a str,
    pub direction: Direction,
    pub body: Bytes,
    pub content_type: &'a str,
    pub request_id: Option<&'a str>,
}

/// HTTP client for hop-to-hop traffic.
#[derive(Debug, Clone)]
pub struct HopClient {
    http: reqwest::Client,
}

impl HopClient {
    /// Build a client whose every call is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// POST `request.body` to a neighbour, carrying this visit's chain and log.
    ///
    /// The neighbour's status, body and content type become ours. Its
    /// chain/log headers win when present, otherwise the local ones from
    /// `visit` are attached.
    pub async fn relay(
        &self,
        request: RelayRequest<'_>,
        visit: &HopVisit,
    ) -> Result<RelayResponse, RelayError> {
        let unreachable = |source: reqwest::Error| RelayError::HopUnreachable {
            target: request.target.to_string(),
            source,
        };

        let mut outbound = self
            .http
            .post(request.target)
            .header(CONTENT_TYPE, request.content_type)
            .header(X_DIRECTION, request.direction.as_str())
            .header(X_HOP_LOG, visit.log.encode());
        if let Ok(chain) = HeaderValue::from_bytes(visit.chain.as_str().as_bytes()) {
            outbound = outbound.header(X_HOP_CHAIN, chain);
        }
        if let Some(id) = request.request_id {
            outbound = outbound.header(X_REQUEST_ID, id);
        }

        tracing::debug!(
            target_url = %request.target,
            direction = %request.direction,
            bytes = request.body.len(),
            "Relaying to neighbour hop"
        );

        let response = outbound.body(request.body).send().await.map_err(unreachable)?;

        let status = response.status();
        let headers = response.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_else(|| TEXT_PLAIN.to_string());
        let chain = headers
            .get(X_HOP_CHAIN)
            .map(|v| HopChain::from_header(Some(&String::from_utf8_lossy(v.as_bytes()))))
            .filter(|chain| !chain.is_empty())
            .unwrap_or_else(|| visit.chain.clone());
        let remote_log = HopLog::decode(
            headers
                .get(X_HOP_LOG)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .as_deref(),
        );
        let log = if remote_log.is_empty() {
            visit.log.clone()
        } else {
            remote_log
        };

        let body = response.bytes().await.map_err(unreachable)?;

        Ok(RelayResponse::new(status, content_type, chain, log, body))
    }
}
