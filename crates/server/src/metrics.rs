//! Prometheus metrics for the Amen server.
//!
//! # Security Note
//!
//! The `/metrics` endpoint is unauthenticated to allow Prometheus scraping.
//!
//! **Deployment Requirement**: The `/metrics` endpoint MUST be network-restricted
//! to authorized Prometheus scraper IPs only. This should be enforced at the
//! infrastructure level (firewall, load balancer, or reverse proxy rules).
//! Do NOT expose `/metrics` on public networks.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    self, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// Upload metrics
pub static SIGNED_URLS_ISSUED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "amen_signed_urls_issued_total",
        "Total number of signed upload URLs issued",
    )
    .expect("metric creation failed")
});

pub static DIRECT_UPLOADS: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "amen_direct_uploads_total",
        "Total number of direct base64 uploads accepted",
    )
    .expect("metric creation failed")
});

pub static DIRECT_UPLOAD_BYTES: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "amen_direct_upload_bytes_total",
        "Total decoded bytes accepted via direct upload",
    )
    .expect("metric creation failed")
});

pub static EXISTENCE_CHECKS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "amen_existence_checks_total",
            "Total audio existence checks by outcome",
        ),
        &["outcome"],
    )
    .expect("metric creation failed")
});

// Metadata metrics
pub static BIBLE_METADATA_QUERIES: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "amen_bible_metadata_queries_total",
        "Total bible audio metadata queries",
    )
    .expect("metric creation failed")
});

// Proxy metrics
pub static PROXY_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "amen_proxy_requests_total",
            "Total proxy requests by endpoint",
        ),
        &["endpoint"],
    )
    .expect("metric creation failed")
});

pub static PROXY_UPSTREAM_ERRORS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "amen_proxy_upstream_errors_total",
            "Total proxy upstream fetch failures by endpoint",
        ),
        &["endpoint"],
    )
    .expect("metric creation failed")
});

pub static PROXY_FETCH_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "amen_proxy_fetch_duration_seconds",
            "Time taken to fetch an upstream image",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
    )
    .expect("metric creation failed")
});

static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry. Idempotent.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(SIGNED_URLS_ISSUED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(DIRECT_UPLOADS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(DIRECT_UPLOAD_BYTES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(EXISTENCE_CHECKS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(BIBLE_METADATA_QUERIES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(PROXY_REQUESTS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(PROXY_UPSTREAM_ERRORS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(PROXY_FETCH_DURATION.clone()))
            .expect("metric registration failed");
    });
}

/// GET /metrics - Prometheus metrics endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}
