//! Shared walking route HTTP service.
//!
//! # Endpoints
//!
//! - `POST /api/shortest-path` - Route two walkers over a set of addresses
//! - `GET /api/test` - Smoke test
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Liveness check
//! - `GET /health/ready` - Readiness check
//!
//! # Configuration
//!
//! - `SHAREDWALK_NOMINATIM_URL`, `SHAREDWALK_OSRM_URL`, `SHAREDWALK_USER_AGENT`,
//!   `SHAREDWALK_TIMEOUT_SECS` - provider settings
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 5000)

use std::env;
use std::net::SocketAddr;

use tracing::{error, info};

use sharedwalk_service::{app, init_logging, init_metrics, AppState, LoggingConfig, MetricsConfig};

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("sharedwalk");
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    info!(port = port, "starting shared walk service");

    // The blocking HTTP clients must be built off the async runtime.
    let state = tokio::task::spawn_blocking(AppState::from_env)
        .await?
        .map_err(|e| {
            error!(error = %e, "failed to initialize application state");
            e
        })?;

    info!(state = ?state, "application state ready");

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
