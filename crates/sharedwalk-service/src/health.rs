//! Liveness and readiness checks.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use sharedwalk_lib::CacheStats;

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok" when the service accepts traffic.
    pub status: String,
    pub service: String,
    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub geocode_cache: Option<CacheSummary>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_cache: Option<CacheSummary>,
}

/// Cache occupancy reported by the readiness check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheSummary {
    pub entries: usize,
    pub capacity: usize,
}

impl From<CacheStats> for CacheSummary {
    fn from(stats: CacheStats) -> Self {
        Self {
            entries: stats.entries,
            capacity: stats.capacity,
        }
    }
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            geocode_cache: None,
            distance_cache: None,
        }
    }

    pub fn ready(service: &str, version: &str, geocodes: CacheStats, distances: CacheStats) -> Self {
        Self {
            geocode_cache: Some(geocodes.into()),
            distance_cache: Some(distances.into()),
            ..Self::alive(service, version)
        }
    }
}

/// `GET /health/live`
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// `GET /health/ready`
///
/// Reports cache occupancy. The providers are remote and contacted lazily,
/// so readiness does not call them.
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let status = HealthStatus::ready(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        state.geocode_stats(),
        state.distance_stats(),
    );
    (StatusCode::OK, Json(status))
}
