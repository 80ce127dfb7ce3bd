//! Route handlers and router assembly.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use sharedwalk_lib::{plan_shared_route, Error as LibError, RouteMap, SharedRoutePlan};

use crate::metrics::{
    metrics_handler, record_cache_stats, record_dropped_locations, record_path_hops,
    record_shared_route_calculated, record_shared_route_failed,
};
use crate::middleware::{extract_or_generate_request_id, track_requests};
use crate::{
    from_lib_error, health_live, health_ready, AppState, ProblemDetails, ServiceResponse,
    ShortestPathRequest, ShortestPathResponse, SmokeTestResponse, Validate,
};

/// Build the service router with permissive CORS and request tracking.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/shortest-path", post(shortest_path_handler))
        .route("/api/test", get(smoke_test_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `GET /api/test`
pub async fn smoke_test_handler() -> Json<SmokeTestResponse> {
    info!("smoke test endpoint called");
    Json(SmokeTestResponse::default())
}

/// `POST /api/shortest-path`
pub async fn shortest_path_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ShortestPathRequest>, JsonRejection>,
) -> Response {
    let request_id = extract_or_generate_request_id(&headers).to_string();

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            record_shared_route_failed("validation_error");
            return ProblemDetails::bad_request(rejection.body_text(), &request_id)
                .into_response();
        }
    };

    if let Err(problem) = request.validate(&request_id) {
        record_shared_route_failed("validation_error");
        return problem.into_response();
    }

    let route_request = request.to_route_request();
    if let Some(id) = route_request.unknown_ids().first() {
        record_shared_route_failed("unknown_location");
        return ProblemDetails::unknown_location(
            id,
            Some("not one of the supplied locations".to_string()),
            &request_id,
        )
        .into_response();
    }

    let include_map = request.wants_map();
    info!(
        request_id = %request_id,
        locations = route_request.locations.len(),
        walkers = ?route_request.walkers,
        "handling shortest path request"
    );

    // Provider calls block, keep them off the async workers.
    let worker_state = state.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let plan = plan_shared_route(worker_state.caches(), &route_request)?;
        let map_html = if include_map {
            render_map(&worker_state, &route_request.locations, &plan)
        } else {
            None
        };
        Ok::<_, LibError>((plan, map_html))
    })
    .await;

    record_cache_stats("geocode", state.geocode_stats());
    record_cache_stats("distance", state.distance_stats());

    let (plan, map_html) = match joined {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            let reason = match &err {
                LibError::NodeNotFound { .. } => "unknown_location",
                _ => "internal_error",
            };
            error!(request_id = %request_id, error = %err, "shared route planning failed");
            record_shared_route_failed(reason);
            return from_lib_error(&err, &request_id).into_response();
        }
        Err(join_error) => {
            error!(request_id = %request_id, error = %join_error, "routing task panicked");
            record_shared_route_failed("internal_error");
            return ProblemDetails::internal_error("route computation did not complete", &request_id)
                .into_response();
        }
    };

    let summary = plan.summary();
    record_shared_route_calculated(summary.reachable1, summary.reachable2);
    record_dropped_locations(summary.dropped.len());
    record_path_hops(plan.shared.first.hops(), "a");
    record_path_hops(plan.shared.second.hops(), "b");

    info!(
        request_id = %request_id,
        path1 = ?summary.path1,
        path2 = ?summary.path2,
        dropped = summary.dropped.len(),
        "shared route computed"
    );

    ServiceResponse::new(ShortestPathResponse::new(summary, map_html)).into_response()
}

fn render_map(
    state: &AppState,
    locations: &sharedwalk_lib::Locations,
    plan: &SharedRoutePlan,
) -> Option<String> {
    let router = state.caches().distances.router();
    RouteMap::build(&plan.build, locations, &plan.shared, router).map(|map| map.to_html())
}
