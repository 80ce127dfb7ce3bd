//! Prometheus metrics for the shared walk service.
//!
//! # Example
//!
//! ```no_run
//! use sharedwalk_service::metrics::{init_metrics, metrics_handler, MetricsConfig};
//! use axum::{routing::get, Router};
//!
//! init_metrics(&MetricsConfig::default()).expect("failed to initialize metrics");
//! let app: Router = Router::new().route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use sharedwalk_lib::CacheStats;

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
        }
    }
}

impl MetricsConfig {
    /// Read `METRICS_ENABLED` (default true). The exporter is always served
    /// on `/metrics`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = lookup("METRICS_ENABLED")
            .map(|v| !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        Self { enabled }
    }
}

/// Install the Prometheus recorder. Call once at start-up.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

/// Axum handler for the `/metrics` endpoint.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

#[derive(Debug, Clone)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

/// Increment `sharedwalk_routes_calculated_total`.
pub fn record_shared_route_calculated(reachable1: bool, reachable2: bool) {
    metrics::counter!(
        "sharedwalk_routes_calculated_total",
        "reachable1" => reachable1.to_string(),
        "reachable2" => reachable2.to_string()
    )
    .increment(1);
}

/// Increment `sharedwalk_routes_failed_total`.
///
/// `reason` is one of `validation_error`, `unknown_location`, `internal_error`.
pub fn record_shared_route_failed(reason: &str) {
    metrics::counter!(
        "sharedwalk_routes_failed_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Record to the `sharedwalk_dropped_locations` histogram.
pub fn record_dropped_locations(count: usize) {
    metrics::histogram!("sharedwalk_dropped_locations").record(count as f64);
}

/// Record to the `sharedwalk_path_hops` histogram.
pub fn record_path_hops(hops: usize, walker: &'static str) {
    metrics::histogram!("sharedwalk_path_hops", "walker" => walker).record(hops as f64);
}

/// Publish cache sizes and hit counts as gauges.
pub fn record_cache_stats(cache: &'static str, stats: CacheStats) {
    metrics::gauge!("sharedwalk_cache_entries", "cache" => cache).set(stats.entries as f64);
    metrics::gauge!("sharedwalk_cache_hits", "cache" => cache).set(stats.hits as f64);
    metrics::gauge!("sharedwalk_cache_misses", "cache" => cache).set(stats.misses as f64);
}
