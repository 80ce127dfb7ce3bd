//! Fixtures for handler tests.
//!
//! State is backed by the library's fake providers, so no test touches the
//! network.

use std::sync::Arc;

use serde_json::{json, Value};
use sharedwalk_lib::test_helpers::{davis, davis_fixture, FakeGeocoder, FakeRouter};

use crate::state::AppState;

/// Providers behind [`test_state`], kept so tests can count calls.
pub struct TestProviders {
    pub geocoder: Arc<FakeGeocoder>,
    pub router: Arc<FakeRouter>,
}

/// Fresh state over the Davis fixture, where `C` cannot be geocoded.
pub fn test_state() -> (AppState, TestProviders) {
    let (_, geocoder, router) = davis_fixture();
    let geocoder = Arc::new(geocoder);
    let router = Arc::new(router);
    let state = AppState::from_providers(geocoder.clone(), router.clone());
    (state, TestProviders { geocoder, router })
}

/// A `POST /api/shortest-path` body over the Davis fixture.
pub fn davis_body(start1: &str, end1: &str, start2: &str, end2: &str) -> Value {
    json!({
        "locations": {
            "A": davis::UC_DAVIS,
            "B": davis::DOWNTOWN,
            "C": davis::NOWHERE,
            "D": davis::DAVIS_COMMONS,
            "E": davis::TRADER_JOES,
        },
        "start1": start1,
        "end1": end1,
        "start2": start2,
        "end2": end2,
    })
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}
