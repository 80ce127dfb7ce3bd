//! Response bodies for successful HTTP responses.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use sharedwalk_lib::{DroppedLocation, LocationId, RouteSummary};

/// Wrapper for successful responses with content type metadata.
///
/// Mirrors the `content_type` field of `ProblemDetails` so clients can tell the
/// two bodies apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub data: T,

    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Body of a successful `POST /api/shortest-path`.
#[derive(Debug, Clone, Serialize)]
pub struct ShortestPathResponse {
    pub path1: Vec<LocationId>,
    pub path2: Vec<LocationId>,
    /// Biased cost of `path2`; `null` when the second walker cannot arrive.
    pub distance2: Option<f64>,
    pub reachable1: bool,
    pub reachable2: bool,
    pub dropped: Vec<DroppedLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_html: Option<String>,
}

impl ShortestPathResponse {
    pub fn new(summary: RouteSummary, map_html: Option<String>) -> Self {
        Self {
            path1: summary.path1,
            path2: summary.path2,
            distance2: summary.distance2,
            reachable1: summary.reachable1,
            reachable2: summary.reachable2,
            dropped: summary.dropped,
            map_html,
        }
    }
}

/// Body of `GET /api/test`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SmokeTestResponse {
    pub message: String,
    pub status: String,
}

impl Default for SmokeTestResponse {
    fn default() -> Self {
        Self {
            message: "Backend is working!".to_string(),
            status: "ok".to_string(),
        }
    }
}
