//! Prometheus metrics for guide-service.
//!
//! HTTP traffic plus relay outcomes and provider latency.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

static METRICS: OnceLock<Metrics> = OnceLock::new();

struct Metrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    relay_requests_total: IntCounterVec,
    provider_latency_seconds: HistogramVec,
}

fn build_metrics() -> Result<Metrics, prometheus::Error> {
    let registry = Registry::new();

    let http_requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )?;

    let http_request_duration_seconds = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        ),
        &["method", "path", "status"],
    )?;

    // outcome: answer, or a RelayError kind
    let relay_requests_total = IntCounterVec::new(
        Opts::new("relay_requests_total", "Total relayed prompts by outcome"),
        &["provider", "outcome"],
    )?;

    let provider_latency_seconds = HistogramVec::new(
        HistogramOpts::new(
            "relay_provider_latency_seconds",
            "Provider API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["provider"],
    )?;

    registry.register(Box::new(http_requests_total.clone()))?;
    registry.register(Box::new(http_request_duration_seconds.clone()))?;
    registry.register(Box::new(relay_requests_total.clone()))?;
    registry.register(Box::new(provider_latency_seconds.clone()))?;

    Ok(Metrics {
        registry,
        http_requests_total,
        http_request_duration_seconds,
        relay_requests_total,
        provider_latency_seconds,
    })
}

/// Initialize all metrics. Safe to call more than once; later calls are no-ops.
pub fn init_metrics() {
    if METRICS.get().is_some() {
        return;
    }

    match build_metrics() {
        Ok(metrics) => {
            let _ = METRICS.set(metrics);
            tracing::info!("Prometheus metrics initialized");
        }
        Err(e) => tracing::error!(error = %e, "Failed to initialize metrics"),
    }
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let Some(metrics) = METRICS.get() else {
        tracing::error!("Metrics registry not initialized");
        return "# Metrics registry not initialized\n".to_string();
    };

    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    if let Err(e) = encoder.encode(&metrics.registry.gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Record a completed HTTP request.
pub fn record_http_request(method: &str, path: &str, status: &str, duration_secs: f64) {
    if let Some(metrics) = METRICS.get() {
        let labels = [method, path, status];
        metrics.http_requests_total.with_label_values(&labels).inc();
        metrics
            .http_request_duration_seconds
            .with_label_values(&labels)
            .observe(duration_secs);
    }
}

/// Record the outcome of one relayed prompt.
pub fn record_relay_outcome(provider: &str, outcome: &str) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .relay_requests_total
            .with_label_values(&[provider, outcome])
            .inc();
    }
}

/// Record provider latency.
pub fn record_provider_latency(provider: &str, duration_secs: f64) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .provider_latency_seconds
            .with_label_values(&[provider])
            .observe(duration_secs);
    }
}
