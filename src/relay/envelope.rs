//! Relay envelope: the per-request view reconstructed from headers and body.

use axum::body::Bytes;
use axum::http::header::{CONTENT_TYPE, HOST, ORIGIN};
use axum::http::{HeaderMap, HeaderName};

use crate::relay::chain::HopChain;
use crate::relay::direction::Direction;
use crate::relay::error::RelayError;
use crate::relay::log::{HopLog, HopRecord};

pub const X_DIRECTION: HeaderName = HeaderName::from_static("x-direction");
/// Direction header used by older hops.
pub const X_MUTTR_DIRECTION: HeaderName = HeaderName::from_static("x-muttr-direction");
pub const X_HOP_CHAIN: HeaderName = HeaderName::from_static("x-hop-chain");
pub const X_HOP_LOG: HeaderName = HeaderName::from_static("x-hop-log");
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");
pub const X_APPSERVICE_HOSTNAME: HeaderName = HeaderName::from_static("x-appservice-hostname");

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_JSON: &str = "application/json";

/// Read a header as text, tolerating non-UTF-8 bytes.
pub fn header_text(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

/// Request headers that hint at this hop's public origin.
#[derive(Debug, Clone, Default)]
pub struct OriginHints {
    pub origin: Option<String>,
    pub host: Option<String>,
    pub forwarded_proto: Option<String>,
    pub appservice_hostname: Option<String>,
}

impl OriginHints {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            origin: header_text(headers, &ORIGIN),
            host: header_text(headers, &HOST),
            forwarded_proto: header_text(headers, &X_FORWARDED_PROTO),
            appservice_hostname: header_text(headers, &X_APPSERVICE_HOSTNAME),
        }
    }
}

/// Inbound relay request, owned by one invocation.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub direction: Direction,
    /// Chain as received, before this hop's entry.
    pub chain: HopChain,
    /// Log as received, before this hop's entry.
    pub log: HopLog,
    pub body: Bytes,
    pub content_type: Option<String>,
    /// Request path plus query, recorded in the log.
    pub path: String,
    pub request_id: Option<String>,
    pub hints: OriginHints,
}

impl Envelope {
    /// Reconstruct the envelope. Fails only on an invalid direction.
    pub fn from_parts(headers: &HeaderMap, path: &str, body: Bytes) -> Result<Self, RelayError> {
        let direction_header =
            header_text(headers, &X_DIRECTION).or_else(|| header_text(headers, &X_MUTTR_DIRECTION));
        let direction = Direction::from_header(direction_header.as_deref())?;

        Ok(Self {
            direction,
            chain: HopChain::from_header(header_text(headers, &X_HOP_CHAIN).as_deref()),
            log: HopLog::decode(header_text(headers, &X_HOP_LOG).as_deref()),
            body,
            content_type: header_text(headers, &CONTENT_TYPE).filter(|ct| !ct.trim().is_empty()),
            path: path.to_string(),
            request_id: header_text(headers, &X_REQUEST_ID),
            hints: OriginHints::from_headers(headers),
        })
    }

    /// Record this hop's visit: one chain entry and one log record.
    pub fn visit(&self, hop: &str, delay_ms: u64) -> HopVisit {
        let chain = self.chain.append(hop, self.direction);
        let record = HopRecord::new(hop, self.direction, &self.path, delay_ms, &chain);
        let log = self.log.append(&record);
        HopVisit { chain, log, record }
    }
}

/// Chain and log after this hop appended its entry.
#[derive(Debug, Clone)]
pub struct HopVisit {
    pub chain: HopChain,
    pub log: HopLog,
    pub record: HopRecord,
}
