//! Hop log codec.
//!
//! The `X-Hop-Log` header has been written in two shapes over time:
//!
//! ```text
//! JSON array   ["{\"hop\":\"a\",...}", {"hop":"b",...}]
//! line-based   {"hop":"a",...}\n{"hop":"b",...}
//! ```
//!
//! Both decode to the same ordered list of JSON objects. Entries that are
//! not JSON objects become `{"raw": <text>}`. Decoding never fails: a
//! missing or garbled header yields an empty or raw-wrapped log and the
//! request carries on. Output is always the compact JSON array form.

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::fmt::Write;

use crate::relay::chain::HopChain;
use crate::relay::direction::Direction;

/// Diagnostic record appended by every hop visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopRecord {
    pub hop: String,
    pub direction: Direction,
    pub path: String,
    pub delay_ms: u64,
    /// Chain as it stood after this visit.
    pub chain: String,
    /// RFC 3339 UTC timestamp.
    pub timestamp: String,
}

impl HopRecord {
    pub fn new(hop: &str, direction: Direction, path: &str, delay_ms: u64, chain: &HopChain) -> Self {
        Self {
            hop: hop.to_string(),
            direction,
            path: path.to_string(),
            delay_ms,
            chain: chain.as_str().to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "hop": self.hop,
            "direction": self.direction.as_str(),
            "path": self.path,
            "delay_ms": self.delay_ms,
            "chain": self.chain,
            "timestamp": self.timestamp,
        })
    }
}

/// Ordered, append-only list of log records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HopLog(Vec<Value>);

impl HopLog {
    /// Decode a header value in either historical encoding.
    pub fn decode(value: Option<&str>) -> Self {
        let Some(text) = value.map(str::trim).filter(|t| !t.is_empty()) else {
            return Self::default();
        };

        if let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(text) {
            return Self(entries.into_iter().map(record_from_entry).collect());
        }

        Self(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(record_from_line)
                .collect(),
        )
    }

    /// Canonical wire encoding: compact, ASCII-only JSON array.
    pub fn encode(&self) -> String {
        let json = serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string());
        escape_non_ascii(&json)
    }

    /// Return a new log with `record` appended.
    pub fn append(&self, record: &HopRecord) -> Self {
        self.push(record.to_value())
    }

    /// Return a new log annotated with an outbound failure of `hop`.
    pub fn with_error(&self, hop: &str, target: &str, error: &str) -> Self {
        self.push(json!({ "hop": hop, "target": target, "error": error }))
    }

    fn push(&self, value: Value) -> Self {
        let mut records = self.0.clone();
        records.push(value);
        Self(records)
    }

    pub fn records(&self) -> &[Value] {
        &self.0
    }

    pub fn into_records(self) -> Vec<Value> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn raw_record(text: &str) -> Value {
    json!({ "raw": text })
}

fn record_from_line(line: &str) -> Value {
    match serde_json::from_str::<Value>(line) {
        Ok(record @ Value::Object(_)) => record,
        _ => raw_record(line),
    }
}

fn record_from_entry(entry: Value) -> Value {
    match entry {
        Value::Object(_) => entry,
        Value::String(line) => record_from_line(line.trim()),
        other => raw_record(&other.to_string()),
    }
}

// Header values must be visible ASCII; JSON lets any char be written as \uXXXX.
// serde_json already escapes C0 controls but leaves DEL as-is.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        if ch.is_ascii() && ch != '\x7f' {
            out.push(ch);
        } else {
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{:04x}", unit);
            }
        }
    }
    out
}
