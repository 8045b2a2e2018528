//! Generation service client.

use axum::body::Bytes;
use axum::http::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

use crate::config::GenerationConfig;
use crate::generation::payload::GenerationRequest;
use crate::relay::envelope::APPLICATION_JSON;
use crate::relay::error::RelayError;

/// Raw reply from the generation service.
///
/// Non-2xx replies are kept as data; only transport failures are errors.
#[derive(Debug, Clone)]
pub struct Completion {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Client for the chat-completions endpoint.
#[derive(Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    app_title: String,
}

impl GenerationClient {
    pub fn new(config: &GenerationConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            app_title: config.app_title.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Call the service once. `referer` identifies this hop to the service.
    pub async fn complete(
        &self,
        request: &GenerationRequest,
        referer: &str,
    ) -> Result<Completion, RelayError> {
        let api_key = self.api_key.as_deref().ok_or(RelayError::MissingApiKey)?;
        let unreachable = |source: reqwest::Error| RelayError::GenerationUnreachable {
            target: self.endpoint.clone(),
            source,
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            model = %request.model,
            messages = request.messages.len(),
            params = request.params.len(),
            "Calling generation service"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header("HTTP-Referer", referer)
            .header("X-Title", &self.app_title)
            .json(request)
            .send()
            .await
            .map_err(unreachable)?;

        let status = response.status();
        let body = response.bytes().await.map_err(unreachable)?;

        Ok(Completion { status, body })
    }
}
