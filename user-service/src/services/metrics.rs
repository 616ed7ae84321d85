//! Metrics collection and Prometheus export.
//!
//! Installs the Prometheus recorder and renders it for the /metrics endpoint.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use service_core::error::AppError;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Serializes recorder installation; the global recorder can be set once.
static INSTALL: Mutex<()> = Mutex::new(());

/// Install the metrics recorder. Must run before any metric is recorded;
/// later calls, concurrent ones included, are no-ops.
pub fn init_metrics() -> Result<(), AppError> {
    let _guard = INSTALL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("failed to install Prometheus recorder: {}", e))
    })?;

    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}


/// Current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

pub fn record_store_operation(operation: &'static str, outcome: &'static str, elapsed: Duration) {
    let labels = [("operation", operation), ("outcome", outcome)];
    counter!("user_store_operations_total", &labels).increment(1);
    histogram!("user_store_operation_duration_seconds", &labels).record(elapsed.as_secs_f64());
}
