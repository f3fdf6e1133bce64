//! Prometheus metrics for story-service.
//!
//! HTTP request metrics come from the `metrics` recorder installed here and fed
//! by `service_core::middleware::metrics`; story-specific metrics live in a
//! dedicated `prometheus` registry. Both are rendered by [`get_metrics`].

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub static STORY_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static STORY_PROVIDER_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static STORY_PROVIDER_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Must be called once at startup.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    let registry = Registry::new();

    let requests_total = IntCounterVec::new(
        Opts::new(
            "story_requests_total",
            "Total story generation requests by outcome",
        ),
        &["outcome"],
    )?;

    let provider_latency = HistogramVec::new(
        HistogramOpts::new(
            "story_provider_latency_seconds",
            "Text provider call duration in seconds",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]),
        &["provider"],
    )?;

    let provider_errors = IntCounterVec::new(
        Opts::new(
            "story_provider_errors_total",
            "Text provider failures by provider and error type",
        ),
        &["provider", "error_type"],
    )?;

    registry.register(Box::new(requests_total.clone()))?;
    registry.register(Box::new(provider_latency.clone()))?;
    registry.register(Box::new(provider_errors.clone()))?;

    if METRICS_HANDLE.set(handle).is_err()
        || REGISTRY.set(registry).is_err()
        || STORY_REQUESTS_TOTAL.set(requests_total).is_err()
        || STORY_PROVIDER_LATENCY_SECONDS.set(provider_latency).is_err()
        || STORY_PROVIDER_ERRORS_TOTAL.set(provider_errors).is_err()
    {
        anyhow::bail!("Metrics already initialized");
    }

    Ok(())
}

/// Render all metrics in the Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        match encoder.encode(&metric_families, &mut buffer) {
            Ok(()) => match String::from_utf8(buffer) {
                Ok(custom_metrics) => output.push_str(&custom_metrics),
                Err(e) => tracing::warn!(error = %e, "Story metrics are not valid UTF-8"),
            },
            Err(e) => tracing::warn!(error = %e, "Failed to encode story metrics"),
        }
    }

    output
}

/// Record the outcome of one `POST /generate-story` call.
pub fn record_story_request(outcome: &str) {
    if let Some(counter) = STORY_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn record_provider_latency(provider: &str, duration_secs: f64) {
    if let Some(histogram) = STORY_PROVIDER_LATENCY_SECONDS.get() {
        histogram
            .with_label_values(&[provider])
            .observe(duration_secs);
    }
}

pub fn record_provider_error(provider: &str, error_type: &str) {
    if let Some(counter) = STORY_PROVIDER_ERRORS_TOTAL.get() {
        counter.with_label_values(&[provider, error_type]).inc();
    }
}
