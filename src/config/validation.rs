//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Hop and generation URLs must be absolute http(s) URLs
//! - Validate value ranges (timeouts > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("hop.name must not be empty")]
    EmptyHopName,

    #[error("{field} is not a valid http(s) URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("listener.bind_address is not a socket address: {0}")]
    InvalidBindAddress(String),

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a configuration, collecting every error found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.hop.name.trim().is_empty() {
        errors.push(ValidationError::EmptyHopName);
    }

    let urls = [
        ("hop.next_hop_url", config.hop.next_hop_url.as_deref()),
        ("hop.prev_hop_url", config.hop.prev_hop_url.as_deref()),
        ("generation.endpoint", Some(config.generation.endpoint.as_str())),
    ];
    for (field, value) in urls {
        if let Some(value) = value {
            if !is_http_url(value) {
                errors.push(ValidationError::InvalidUrl {
                    field,
                    value: value.to_string(),
                });
            }
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.timeouts.outbound_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("outbound_secs"));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&RelayConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = RelayConfig::default();
        config.hop.name = "  ".into();
        config.hop.next_hop_url = Some("not a url".into());
        config.hop.prev_hop_url = Some("ftp://files.example".into());
        config.timeouts.outbound_secs = 0;
        config.listener.bind_address = "localhost".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::EmptyHopName));
        assert!(errors.contains(&ValidationError::ZeroTimeout("outbound_secs")));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::InvalidUrl { field: "hop.prev_hop_url", .. }
        )));
    }

    #[test]
    fn accepts_hop_urls_with_paths() {
        let mut config = RelayConfig::default();
        config.hop.next_hop_url = Some("https://b.example/api/muttr?code=abc".into());
        config.hop.prev_hop_url = Some("http://127.0.0.1:7071/api/hop".into());
        assert!(validate_config(&config).is_ok());
    }
}
