//! Best-effort public origin of this hop.
//!
//! Used only for the identification header sent to the generation service,
//! so every step falls back instead of failing.

use url::Url;

use crate::config::IdentityConfig;
use crate::relay::envelope::OriginHints;

/// Derive `scheme://host` for this hop.
pub fn derive_referer(identity: &IdentityConfig, hints: &OriginHints) -> String {
    let host = derive_host(identity, hints);
    if host.contains("://") {
        return host;
    }
    format!("{}://{}", derive_scheme(hints), host)
}

/// First non-empty host candidate, else the machine hostname.
pub fn derive_host(identity: &IdentityConfig, hints: &OriginHints) -> String {
    let origin_host = hints.origin.as_deref().and_then(parse_url).and_then(|url| {
        url.host_str().map(|host| match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    });

    [
        identity.public_hostname.clone(),
        identity.platform_hostname.clone(),
        hints.appservice_hostname.clone(),
        hints.host.clone(),
        origin_host,
    ]
    .into_iter()
    .flatten()
    .map(|candidate| candidate.trim().to_string())
    .find(|candidate| !candidate.is_empty())
    .unwrap_or_else(machine_hostname)
}

/// `X-Forwarded-Proto`, else the Origin's scheme, else `https`.
pub fn derive_scheme(hints: &OriginHints) -> String {
    let forwarded = hints
        .forwarded_proto
        .as_deref()
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|proto| !proto.is_empty())
        .map(str::to_string);
    let from_origin = || {
        hints
            .origin
            .as_deref()
            .and_then(parse_url)
            .map(|url| url.scheme().to_string())
    };

    forwarded
        .or_else(from_origin)
        .unwrap_or_else(|| "https".to_string())
        .trim_end_matches(':')
        .to_string()
}

fn parse_url(value: &str) -> Option<Url> {
    Url::parse(value.trim()).ok()
}

fn machine_hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
