//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay and preflight handlers
//! - Wire up middleware (request ID, tracing, CORS, timeout, body limit)
//! - Bind server to listener (plain TCP or TLS)
//! - Turn inbound requests into relay envelopes

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::middleware::cors::{cors_middleware, preflight_handler};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::relay::{Envelope, HopRelay};

/// Grace period for in-flight requests once shutdown is signalled.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build outbound HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: HopRelay,
}

/// HTTP server for one hop.
pub struct HttpServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let config = Arc::new(config);
        let state = AppState {
            relay: HopRelay::new(config.clone())?,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", post(relay_handler).options(preflight_handler))
            .route("/{*path}", post(relay_handler).options(preflight_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn(cors_middleware))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
            )
    }

    /// The configured router, for serving on a custom transport or in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on a plain TCP listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            hop = %self.config.hop.name,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        tracing::info!(
            address = %addr,
            hop = %self.config.hop.name,
            "HTTPS server starting"
        );

        let handle = axum_server::Handle::new();
        let signal = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received");
            signal.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Relay handler: every POST on any path is relay traffic.
async fn relay_handler(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    let envelope = match Envelope::from_parts(&headers, path, body) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!(error = %err, path = %path, "Rejecting relay request");
            return (err.status(), err.to_string()).into_response();
        }
    };

    state.relay.handle(envelope).await.into_response()
}
