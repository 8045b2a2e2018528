//! Shared utilities for hop relay integration tests.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use hop_relay::{HttpServer, RelayConfig, Shutdown};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const HOP_PATH: &str = "/api/hop";

/// Bind an ephemeral local port.
pub async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    (listener, base)
}

/// A URL nothing is listening on.
pub async fn unused_url() -> String {
    let (listener, base) = bind().await;
    drop(listener);
    format!("{}{}", base, HOP_PATH)
}

/// Minimal hop config for tests.
pub fn hop_config(name: &str, next: Option<&str>, prev: Option<&str>) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.hop.name = name.to_string();
    config.hop.next_hop_url = next.map(str::to_string);
    config.hop.prev_hop_url = prev.map(str::to_string);
    config.identity.public_hostname = Some("hop.test".to_string());
    config.timeouts.outbound_secs = 5;
    config
}

/// Point a config at a mock generation service.
pub fn with_generation(mut config: RelayConfig, endpoint: &str) -> RelayConfig {
    config.generation.endpoint = endpoint.to_string();
    config.generation.api_key = Some("test-key".to_string());
    config.generation.model = "test/default-model".to_string();
    config
}

/// Serve a hop on an already bound listener.
pub async fn start_hop(listener: TcpListener, config: RelayConfig, shutdown: &Shutdown) {
    let server = HttpServer::new(config).unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
}

/// One request as seen by the mock generation service.
#[derive(Debug, Clone)]
pub struct CapturedCall {
    pub headers: HeaderMap,
    pub body: Value,
}

/// Behaviour of the mock generation service.
#[derive(Clone)]
pub struct MockGeneration {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl MockGeneration {
    pub fn replying(text: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({
                "id": "gen-1",
                "choices": [{ "message": { "role": "assistant", "content": text } }]
            })
            .to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone)]
struct MockState {
    behaviour: MockGeneration,
    calls: Arc<Mutex<Vec<CapturedCall>>>,
}

/// Start a mock chat-completions endpoint; returns its URL and the call log.
pub async fn start_mock_generation(
    behaviour: MockGeneration,
) -> (String, Arc<Mutex<Vec<CapturedCall>>>) {
    let (listener, base) = bind().await;
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        behaviour,
        calls: calls.clone(),
    };

    let app = Router::new()
        .route("/v1/chat/completions", post(mock_completion))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("{}/v1/chat/completions", base), calls)
}

async fn mock_completion(
    State(state): State<MockState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(&'static str, &'static str); 1], String) {
    let parsed = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.calls.lock().unwrap().push(CapturedCall {
        headers,
        body: parsed,
    });
    if !state.behaviour.delay.is_zero() {
        tokio::time::sleep(state.behaviour.delay).await;
    }
    (
        state.behaviour.status,
        [("content-type", "application/json")],
        state.behaviour.body.clone(),
    )
}

/// Client that ignores any proxy settings of the test environment.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap()
}

/// Header value as text, or "" when absent.
pub fn header(response: &reqwest::Response, name: &str) -> String {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Start a neighbour that answers every POST with `body` and no relay headers.
pub async fn start_plain_neighbour(body: &'static str) -> String {
    let (listener, base) = bind().await;
    let app = Router::new().route(HOP_PATH, post(move || async move { body }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("{}{}", base, HOP_PATH)
}
