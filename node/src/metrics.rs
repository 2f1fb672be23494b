//! # Prometheus Metrics
//!
//! Operational metrics for the query service, scraped at the `/metrics`
//! endpoint on the configured metrics port.
//!
//! All metrics live in a dedicated [`prometheus::Registry`] so they do not
//! collide with any default global registry consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

/// Holds all Prometheus metric handles for the service.
///
/// Clone-friendly (prometheus handles wrap `Arc` internally) so it can be
/// shared across request handlers.
#[derive(Clone)]
pub struct QueryMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Total query requests served, success or failure.
    pub queries_total: IntCounter,
    /// Query requests that ended in an error response.
    pub queries_failed_total: IntCounter,
    /// Upstream capability calls that reported a failure.
    pub upstream_failures_total: IntCounter,
    /// Total transactions returned across all pages.
    pub transactions_returned_total: IntCounter,
    /// Number of chain integrations registered at startup.
    pub chains_registered: IntGauge,
    /// Histogram of end-to-end query latency in seconds.
    pub query_latency_seconds: Histogram,
}

impl QueryMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("prism".into()), None)
            .expect("failed to create prometheus registry");

        let queries_total = IntCounter::new(
            "queries_total",
            "Total query requests served, success or failure",
        )
        .expect("metric creation");
        registry
            .register(Box::new(queries_total.clone()))
            .expect("metric registration");

        let queries_failed_total = IntCounter::new(
            "queries_failed_total",
            "Query requests that ended in an error response",
        )
        .expect("metric creation");
        registry
            .register(Box::new(queries_failed_total.clone()))
            .expect("metric registration");

        let upstream_failures_total = IntCounter::new(
            "upstream_failures_total",
            "Upstream capability calls that reported a failure",
        )
        .expect("metric creation");
        registry
            .register(Box::new(upstream_failures_total.clone()))
            .expect("metric registration");

        let transactions_returned_total = IntCounter::new(
            "transactions_returned_total",
            "Total transactions returned across all pages",
        )
        .expect("metric creation");
        registry
            .register(Box::new(transactions_returned_total.clone()))
            .expect("metric registration");

        let chains_registered = IntGauge::new(
            "chains_registered",
            "Number of chain integrations registered at startup",
        )
        .expect("metric creation");
        registry
            .register(Box::new(chains_registered.clone()))
            .expect("metric registration");

        let query_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "query_latency_seconds",
                "End-to-end query latency in seconds, upstream call included",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
        )
        .expect("metric creation");
        registry
            .register(Box::new(query_latency_seconds.clone()))
            .expect("metric registration");

        Self {
            registry,
            queries_total,
            queries_failed_total,
            upstream_failures_total,
            transactions_returned_total,
            chains_registered,
            query_latency_seconds,
        }
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer).expect("prometheus output is valid utf-8"))
    }
}

impl Default for QueryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<QueryMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
///
/// Returns HTTP 500 if encoding fails (should never happen in practice).
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_the_exposition_output() {
        let metrics = QueryMetrics::new();
        metrics.queries_total.inc();
        metrics.transactions_returned_total.inc_by(25);

        let body = metrics.encode().expect("encode");
        assert!(body.contains("prism_queries_total 1"));
        assert!(body.contains("prism_transactions_returned_total 25"));
    }
}
