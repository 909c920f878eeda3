//! Metrics collection and Prometheus export.
//!
//! Initializes the metrics exporter and provides the /metrics endpoint handler.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// Must be called once at startup before any metrics are recorded. Later calls
/// are no-ops.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::error!("Failed to install Prometheus recorder: {}", e),
    }
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

/// Records one store round-trip (connect, query, close).
pub fn record_store_query(
    store: &'static str,
    operation: &'static str,
    started: Instant,
    ok: bool,
) {
    let outcome = if ok { "success" } else { "error" };

    counter!(
        "bridge_store_queries_total",
        "store" => store,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "bridge_store_query_duration_seconds",
        "store" => store,
        "operation" => operation
    )
    .record(started.elapsed().as_secs_f64());
}
