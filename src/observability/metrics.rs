//! Metrics collection and exposition.
//!
//! # Metrics
//! - `hop_requests_total` (counter): handled relay requests by direction, status
//! - `hop_request_duration_seconds` (histogram): time spent per visit, by direction
//! - `hop_outbound_failures_total` (counter): transport failures by kind
//!
//! Per-request timing covers the whole downstream journey, so the buckets
//! reach into minutes.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

use crate::relay::Direction;

const DURATION_BUCKETS: &[f64] = &[
    0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0,
];

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    let builder = match builder.set_buckets_for_metric(
        Matcher::Suffix("duration_seconds".to_string()),
        DURATION_BUCKETS,
    ) {
        Ok(builder) => builder,
        Err(e) => {
            tracing::error!(error = %e, "Invalid histogram buckets, metrics disabled");
            return;
        }
    };

    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled relay request.
pub fn record_hop(direction: Direction, status: u16, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();
    counter!(
        "hop_requests_total",
        "direction" => direction.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("hop_request_duration_seconds", "direction" => direction.as_str()).record(elapsed);
}

/// Record an outbound call that never produced a response.
pub fn record_outbound_failure(kind: &'static str, timed_out: bool) {
    counter!(
        "hop_outbound_failures_total",
        "kind" => kind,
        "timeout" => if timed_out { "true" } else { "false" }
    )
    .increment(1);
}
