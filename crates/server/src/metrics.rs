//! Prometheus metrics for observability.
//!
//! Conversion traffic is the interesting signal here: how many requests
//! reach a terminal state, with which outcome, and how long the backend
//! invocation takes per category.

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Conversions reaching a terminal state, labelled by outcome
/// ("success" or the error kind).
pub static CONVERSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "convertiverse_conversions_total",
            "Conversion requests by terminal outcome",
        ),
        &["outcome"],
    )
    .unwrap()
});

/// Wall-clock duration of successful conversions.
pub static CONVERSION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "convertiverse_conversion_duration_seconds",
            "Duration of successful conversions",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["category"],
    )
    .unwrap()
});

/// Artifact downloads served.
pub static DOWNLOADS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "convertiverse_downloads_total",
        "Converted artifacts downloaded",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(CONVERSIONS_TOTAL.clone()))
        .expect("register conversions_total");
    registry
        .register(Box::new(CONVERSION_DURATION.clone()))
        .expect("register conversion_duration");
    registry
        .register(Box::new(DOWNLOADS_TOTAL.clone()))
        .expect("register downloads_total");
}

/// Renders the registry in the Prometheus text exposition format.
pub fn render() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::warn!(error = %e, "failed to encode metrics");
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
