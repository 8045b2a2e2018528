//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the startup configuration: optional TOML file, then environment
/// overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => RelayConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML configuration file without validating it.
pub fn read_config_file(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply the per-hop environment variables on top of `config`.
///
/// `lookup` abstracts the environment so tests never touch process state.
/// Empty values count as unset.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| {
        lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(name) = var("HOP_NAME") {
        config.hop.name = name;
    }
    if let Some(url) = var("NEXT_HOP_URL") {
        config.hop.next_hop_url = Some(url);
    }
    if let Some(url) = var("PREV_HOP_URL") {
        config.hop.prev_hop_url = Some(url);
    }
    if let Some(delay) = var("DELAY_MS") {
        config.hop.delay_ms = delay.parse().map_err(|_| ConfigError::Env {
            var: "DELAY_MS",
            value: delay.clone(),
        })?;
    }
    if let Some(key) = var("OPENROUTER_API_KEY") {
        config.generation.api_key = Some(key);
    }
    if let Some(model) = var("OPENROUTER_MODEL") {
        config.generation.model = model;
    }
    if let Some(endpoint) = var("OPENROUTER_ENDPOINT") {
        config.generation.endpoint = endpoint;
    }
    if let Some(host) = var("MUTTR_HOSTNAME") {
        config.identity.public_hostname = Some(host);
    }
    if let Some(host) = var("WEBSITE_HOSTNAME") {
        config.identity.platform_hostname = Some(host);
    }
    if let Some(addr) = var("BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_hop_settings() {
        let mut config = RelayConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("HOP_NAME", "sydney"),
                ("NEXT_HOP_URL", "https://next.example/api/hop"),
                ("DELAY_MS", "1500"),
                ("OPENROUTER_API_KEY", "sk-test"),
                ("OPENROUTER_MODEL", "meta/llama"),
                ("WEBSITE_HOSTNAME", "sydney.azurewebsites.net"),
            ]),
        )
        .unwrap();

        assert_eq!(config.hop.name, "sydney");
        assert_eq!(config.hop.next_hop_url.as_deref(), Some("https://next.example/api/hop"));
        assert_eq!(config.hop.prev_hop_url, None);
        assert_eq!(config.hop.delay_ms, 1500);
        assert_eq!(config.generation.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.generation.model, "meta/llama");
        assert_eq!(
            config.identity.platform_hostname.as_deref(),
            Some("sydney.azurewebsites.net")
        );
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = RelayConfig::default();
        config.hop.prev_hop_url = Some("http://prev".into());
        apply_env_overrides(&mut config, env(&[("PREV_HOP_URL", "  "), ("HOP_NAME", "")])).unwrap();

        assert_eq!(config.hop.prev_hop_url.as_deref(), Some("http://prev"));
        assert_eq!(config.hop.name, "unknown-hop");
    }

    #[test]
    fn bad_delay_is_reported() {
        let mut config = RelayConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("DELAY_MS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "DELAY_MS", .. }));
    }

    #[test]
    fn validation_errors_are_joined() {
        let err = ConfigError::Validation(vec![
            ValidationError::EmptyHopName,
            ValidationError::ZeroTimeout("outbound_secs"),
        ]);
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains(", "));
    }
}
