//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a hop.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default system prompt used when a payload carries no usable messages.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a chaotic todo-list game of telephone. Repeat and mutate this list as you see fit.";

/// Default chat-completions endpoint of the generation service.
pub const DEFAULT_GENERATION_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Root configuration for a relay hop.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Identity and neighbours of this hop.
    pub hop: HopConfig,

    /// Generation service settings, used only by the terminal forward hop.
    pub generation: GenerationConfig,

    /// Hostname hints for the outbound identification header.
    pub identity: IdentityConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Inbound request limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Position of this hop in the chain.
///
/// Topology lives entirely here: a hop without `next_hop_url` calls the
/// generation service, a hop without `prev_hop_url` is the originator.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HopConfig {
    /// Name recorded in the hop chain and log.
    pub name: String,

    /// Next hop on the forward leg.
    pub next_hop_url: Option<String>,

    /// Previous hop, target of the return leg.
    pub prev_hop_url: Option<String>,

    /// Artificial delay applied before forwarding, in milliseconds.
    pub delay_ms: u64,
}

impl Default for HopConfig {
    fn default() -> Self {
        Self {
            name: "unknown-hop".to_string(),
            next_hop_url: None,
            prev_hop_url: None,
            delay_ms: 0,
        }
    }
}

impl HopConfig {
    pub fn is_terminal_forward(&self) -> bool {
        self.next_hop_url.is_none()
    }

    pub fn is_origin(&self) -> bool {
        self.prev_hop_url.is_none()
    }
}

/// Generation service configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Chat-completions endpoint.
    pub endpoint: String,

    /// Bearer token for the service.
    pub api_key: Option<String>,

    /// Model used when the payload does not name one.
    pub model: String,

    /// Value of the `X-Title` header sent with every completion.
    pub app_title: String,

    /// System prompt for the plain-text fallback.
    pub system_prompt: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GENERATION_ENDPOINT.to_string(),
            api_key: None,
            model: "openai/gpt-4o-mini".to_string(),
            app_title: "muttr".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

// Keeps the API key out of startup logs.
impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("app_title", &self.app_title)
            .finish_non_exhaustive()
    }
}

/// Hostname hints, in priority order, for deriving this hop's public origin.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct IdentityConfig {
    /// Explicit public hostname of this deployment.
    pub public_hostname: Option<String>,

    /// Hostname assigned by the hosting platform.
    pub platform_hostname: Option<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound for handling one inbound request, in seconds.
    ///
    /// The originator waits for the whole journey, so this must exceed the
    /// sum of every hop's delay and outbound time.
    pub request_secs: u64,

    /// Upper bound for one outbound call (next/previous hop or generation
    /// service), in seconds.
    pub outbound_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 600,
            outbound_secs: 120,
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
