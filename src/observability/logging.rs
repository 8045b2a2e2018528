//! Structured logging.
//!
//! `RUST_LOG` takes precedence over the configured level. JSON output is
//! meant for log shipping, the default format for terminals.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global tracing subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "hop_relay={level},tower_http={level}",
            level = config.log_level
        ))
    });

    let (json, text) = if config.json_logs {
        (Some(fmt::layer().json()), None)
    } else {
        (None, Some(fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .init();
}
