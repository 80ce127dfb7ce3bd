//! HTTP service for shared walking routes.
//!
//! - [`handlers::app`]: the axum router (`POST /api/shortest-path`, `GET /api/test`)
//! - [`AppState`]: process-wide provider caches
//! - [`health`]: liveness and readiness checks
//! - [`ProblemDetails`]: RFC 9457 error bodies
//! - [`ServiceResponse`]: success wrapper with content type
//! - [`metrics`], [`logging`], [`middleware`]: observability
//!
//! Handlers stay thin; all routing logic lives in `sharedwalk-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Validate fields                                          │
//! │  - Call sharedwalk-lib on a blocking worker                 │
//! │  - Format response                                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Enable the `test-utils` feature to use [`test_utils`] from other crates.

pub mod handlers;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use handlers::app;
pub use health::{health_live, health_ready, CacheSummary, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{init_metrics, metrics_handler, MetricsConfig, MetricsError};
pub use middleware::{extract_or_generate_request_id, track_requests, RequestId};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST,
    PROBLEM_MISSING_DATA, PROBLEM_UNKNOWN_LOCATION,
};
pub use request::{ShortestPathRequest, Validate};
pub use response::{ServiceResponse, ShortestPathResponse, SmokeTestResponse};
pub use state::{AppState, AppStateError};
