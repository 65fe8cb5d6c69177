//! Process-wide Prometheus metrics, registered in the default registry on
//! first use.

use once_cell::sync::Lazy;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, TextEncoder};
use tracing::warn;

fn counter(name: &str, help: &str) -> IntCounter {
    let c = IntCounter::new(name, help).expect("metric name is valid");
    prometheus::register(Box::new(c.clone())).expect("metric registered once");
    c
}

pub static DATAGRAMS_TOTAL: Lazy<IntCounter> =
    Lazy::new(|| counter("vigil_datagrams_total", "UDP datagrams received"));

pub static LINES_TOTAL: Lazy<IntCounter> =
    Lazy::new(|| counter("vigil_lines_total", "Graphite lines parsed successfully"));

pub static PARSE_ERRORS_TOTAL: Lazy<IntCounter> =
    Lazy::new(|| counter("vigil_parse_errors_total", "Malformed Graphite lines"));

pub static DROPPED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    counter(
        "vigil_dropped_total",
        "Datagrams or samples dropped due to ingest backpressure",
    )
});

pub static ANOMALIES_DROPPED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    counter(
        "vigil_anomalies_dropped_total",
        "Significant anomalies dropped because the persistence queue was full",
    )
});

pub static EVALUATIONS_TOTAL: Lazy<IntCounter> =
    Lazy::new(|| counter("vigil_evaluations_total", "Metric windows evaluated"));

pub static ANOMALIES_TOTAL: Lazy<IntCounter> =
    Lazy::new(|| counter("vigil_anomalies_total", "Windows flagged by consensus"));

pub static SIGNIFICANT_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    counter(
        "vigil_significant_anomalies_total",
        "Anomalies whose timing broke the metric's usual trigger cadence",
    )
});

pub static EVAL_LATENCY: Lazy<Histogram> = Lazy::new(|| {
    let h = Histogram::with_opts(HistogramOpts::new(
        "vigil_eval_duration_seconds",
        "Time spent evaluating one metric window",
    ))
    .expect("metric name is valid");
    prometheus::register(Box::new(h.clone())).expect("metric registered once");
    h
});

pub static TRACKED_METRICS: Lazy<IntGauge> = Lazy::new(|| {
    let g = IntGauge::new("vigil_tracked_metrics", "Metrics held across all shards")
        .expect("metric name is valid");
    prometheus::register(Box::new(g.clone())).expect("metric registered once");
    g
});

/// Force registration so every series shows up on the first scrape.
pub fn init() {
    Lazy::force(&DATAGRAMS_TOTAL);
    Lazy::force(&LINES_TOTAL);
    Lazy::force(&PARSE_ERRORS_TOTAL);
    Lazy::force(&DROPPED_TOTAL);
    Lazy::force(&ANOMALIES_DROPPED_TOTAL);
    Lazy::force(&EVALUATIONS_TOTAL);
    Lazy::force(&ANOMALIES_TOTAL);
    Lazy::force(&SIGNIFICANT_TOTAL);
    Lazy::force(&EVAL_LATENCY);
    Lazy::force(&TRACKED_METRICS);
}

/// Default registry in the Prometheus text format.
pub fn render() -> String {
    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&prometheus::gather(), &mut buffer) {
        warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8(buffer).unwrap_or_default()
}
