//! Hop relay handler: direction dispatch plus the forward and return legs.

use axum::http::StatusCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RelayConfig;
use crate::generation::{GenerationClient, GenerationRequest};
use crate::net::origin::derive_referer;
use crate::observability::metrics;
use crate::relay::client::{HopClient, RelayRequest};
use crate::relay::direction::Direction;
use crate::relay::envelope::{Envelope, HopVisit, APPLICATION_JSON, TEXT_PLAIN};
use crate::relay::error::RelayError;
use crate::relay::response::RelayResponse;
use crate::relay::summary::Summary;

/// Everything a hop needs to serve relay traffic.
///
/// Immutable after construction; cloned into each request.
#[derive(Clone)]
pub struct HopRelay {
    config: Arc<RelayConfig>,
    hops: HopClient,
    generation: GenerationClient,
}

impl HopRelay {
    pub fn new(config: Arc<RelayConfig>) -> Result<Self, reqwest::Error> {
        let outbound = Duration::from_secs(config.timeouts.outbound_secs);
        Ok(Self {
            hops: HopClient::new(outbound)?,
            generation: GenerationClient::new(&config.generation, outbound)?,
            config,
        })
    }

    /// Handle one relay request end to end.
    ///
    /// Exactly one chain entry and one log record are added before any
    /// outbound call, so a failing hop still shows up in the log.
    pub async fn handle(&self, envelope: Envelope) -> RelayResponse {
        let start = Instant::now();
        let hop = &self.config.hop;
        let visit = envelope.visit(&hop.name, hop.delay_ms);

        tracing::info!(
            hop = %visit.record.hop,
            direction = %visit.record.direction,
            path = %visit.record.path,
            delay_ms = visit.record.delay_ms,
            chain = %visit.record.chain,
            chain_len = visit.chain.len(),
            timestamp = %visit.record.timestamp,
            request_id = envelope.request_id.as_deref().unwrap_or("-"),
            "Hop visit"
        );

        let result = match envelope.direction {
            Direction::Forward => self.forward(&envelope, &visit).await,
            Direction::Return => self.return_leg(&envelope, &visit).await,
        };

        let response = result.unwrap_or_else(|err| self.failure(err, &visit));
        metrics::record_hop(envelope.direction, response.status.as_u16(), start);
        response
    }

    async fn forward(&self, envelope: &Envelope, visit: &HopVisit) -> Result<RelayResponse, RelayError> {
        let hop = &self.config.hop;
        if hop.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(hop.delay_ms)).await;
        }

        if let Some(next) = hop.next_hop_url.as_deref() {
            let request = RelayRequest {
                target: next,
                direction: Direction::Forward,
                body: envelope.body.clone(),
                content_type: envelope.content_type.as_deref().unwrap_or(TEXT_PLAIN),
                request_id: envelope.request_id.as_deref(),
            };
            return self.hops.relay(request, visit).await;
        }

        if !self.generation.is_configured() {
            return Err(RelayError::MissingApiKey);
        }

        let generation = &self.config.generation;
        let request =
            GenerationRequest::from_body(&envelope.body, &generation.model, &generation.system_prompt);
        let referer = derive_referer(&self.config.identity, &envelope.hints);
        let completion = self.generation.complete(&request, &referer).await?;

        if completion.status.is_success() {
            tracing::info!(model = %request.model, status = %completion.status, "Generation complete");
        } else {
            tracing::warn!(
                model = %request.model,
                status = %completion.status,
                "Generation service returned an error, relaying it as-is"
            );
        }

        match hop.prev_hop_url.as_deref() {
            Some(prev) => {
                let request = RelayRequest {
                    target: prev,
                    direction: Direction::Return,
                    body: completion.body,
                    content_type: APPLICATION_JSON,
                    request_id: envelope.request_id.as_deref(),
                };
                self.hops.relay(request, visit).await
            }
            None => Ok(RelayResponse::new(
                StatusCode::OK,
                APPLICATION_JSON,
                visit.chain.clone(),
                visit.log.clone(),
                completion.body,
            )),
        }
    }

    async fn return_leg(&self, envelope: &Envelope, visit: &HopVisit) -> Result<RelayResponse, RelayError> {
        if let Some(prev) = self.config.hop.prev_hop_url.as_deref() {
            let request = RelayRequest {
                target: prev,
                direction: Direction::Return,
                body: envelope.body.clone(),
                content_type: APPLICATION_JSON,
                request_id: envelope.request_id.as_deref(),
            };
            return self.hops.relay(request, visit).await;
        }

        let summary = Summary::build(&envelope.body, &visit.chain, visit.log.clone());
        tracing::info!(
            hops = summary.hop_log.len(),
            chain = %summary.hop_chain,
            "Journey completed"
        );
        let body = summary.to_json_pretty()?;

        Ok(RelayResponse::new(
            StatusCode::OK,
            APPLICATION_JSON,
            visit.chain.clone(),
            visit.log.clone(),
            body,
        ))
    }

    fn failure(&self, err: RelayError, visit: &HopVisit) -> RelayResponse {
        let log = match err.target() {
            Some(target) => {
                let cause = match &err {
                    RelayError::HopUnreachable { source, .. }
                    | RelayError::GenerationUnreachable { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                let kind = match err {
                    RelayError::GenerationUnreachable { .. } => "generation",
                    _ => "hop",
                };
                metrics::record_outbound_failure(kind, err.is_timeout());
                tracing::error!(
                    hop = %self.config.hop.name,
                    target_url = %target,
                    timeout = err.is_timeout(),
                    error = %cause,
                    "Outbound call failed"
                );
                visit.log.with_error(&self.config.hop.name, target, &cause)
            }
            None => {
                tracing::error!(hop = %self.config.hop.name, error = %err, "Relay failed");
                visit.log.clone()
            }
        };

        RelayResponse::new(err.status(), TEXT_PLAIN, visit.chain.clone(), log, err.to_string())
    }
}
