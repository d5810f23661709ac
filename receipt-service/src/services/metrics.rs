//! Prometheus metrics for receipt-service.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub static EXTRACTION_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static PROVIDER_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static DB_QUERY_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

/// Initialize all metrics. Must be called once at startup.
pub fn init_metrics() {
    let registry = Registry::new();

    let extraction_requests = IntCounterVec::new(
        Opts::new(
            "extraction_requests_total",
            "Total receipt extraction attempts",
        ),
        &["outcome"], // structured, heuristic, unreadable, provider_error
    )
    .expect("Failed to create extraction_requests_total metric");

    let provider_latency = HistogramVec::new(
        HistogramOpts::new(
            "vision_provider_latency_seconds",
            "Vision provider API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["provider"],
    )
    .expect("Failed to create vision_provider_latency_seconds metric");

    let db_duration = HistogramVec::new(
        HistogramOpts::new(
            "db_query_duration_seconds",
            "Database query duration in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        &["operation"],
    )
    .expect("Failed to create db_query_duration_seconds metric");

    registry
        .register(Box::new(extraction_requests.clone()))
        .expect("Failed to register extraction_requests_total");
    registry
        .register(Box::new(provider_latency.clone()))
        .expect("Failed to register vision_provider_latency_seconds");
    registry
        .register(Box::new(db_duration.clone()))
        .expect("Failed to register db_query_duration_seconds");

    let _ = REGISTRY.set(registry);
    let _ = EXTRACTION_REQUESTS_TOTAL.set(extraction_requests);
    let _ = PROVIDER_LATENCY_SECONDS.set(provider_latency);
    let _ = DB_QUERY_DURATION_SECONDS.set(db_duration);

    tracing::info!("Prometheus metrics initialized");
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    if let Err(e) = encoder.encode(&registry.gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
        format!("# Failed to convert metrics to UTF-8: {}\n", e)
    })
}

/// Record the outcome of one extraction attempt.
pub fn record_extraction(outcome: &str) {
    if let Some(counter) = EXTRACTION_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

/// Record vision provider latency.
pub fn record_provider_latency(duration_secs: f64) {
    if let Some(histogram) = PROVIDER_LATENCY_SECONDS.get() {
        histogram.with_label_values(&["gemini"]).observe(duration_secs);
    }
}

/// Record database query duration.
pub fn record_db_query(operation: &str, duration_secs: f64) {
    if let Some(histogram) = DB_QUERY_DURATION_SECONDS.get() {
        histogram.with_label_values(&[operation]).observe(duration_secs);
    }
}
