//! Shared walking route library entry points.
//!
//! This crate geocodes a set of addresses, builds a walking graph from
//! pairwise walking distances, and routes two walkers over it so that the
//! second walker is drawn toward the first walker's path. Higher-level
//! consumers (CLI, HTTP service) should only depend on the functions exported
//! here instead of reimplementing behavior.
//!
//! Geocoding and walking distances come from external services behind the
//! [`Geocoder`] and [`WalkingRouter`] traits; [`RoutingCaches`] memoizes both
//! for the lifetime of the process.

use std::collections::BTreeMap;

pub mod cache;
pub mod error;
pub mod geo;
pub mod graph;
pub mod map;
pub mod nominatim;
pub mod osrm;
pub mod path;
pub mod provider;
pub mod routing;
pub mod shared;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;

/// Caller supplied location identifier, e.g. `"A"`.
pub type LocationId = String;

/// Identifier to free-text address. Ordered so pair enumeration is stable.
pub type Locations = BTreeMap<LocationId, String>;

pub use cache::{CacheStats, DistanceCache, GeocodeCache, RoutingCaches};
pub use error::{Error, ProviderError, Result};
pub use geo::{Coordinate, UNREACHABLE};
pub use graph::{
    build_graph, DropReason, DroppedLocation, Graph, GraphBuild, GraphBuildOptions,
    MAX_EDGE_MILES,
};
pub use map::{RouteMap, DEFAULT_MAP_FILE};
pub use nominatim::NominatimGeocoder;
pub use osrm::OsrmWalkingRouter;
pub use path::{shortest_path, PathOutcome};
pub use provider::{Geocoder, ProviderConfig, WalkingRouter};
pub use routing::{plan_shared_route, RouteSummary, SharedRoutePlan, SharedRouteRequest};
pub use shared::{find_shared_path, SharedPath, WalkerPair, PATH_BIAS_FACTOR};

/// Build the default HTTP-backed providers and wrap them in fresh caches.
pub fn default_caches(config: &ProviderConfig) -> Result<RoutingCaches> {
    let geocoder = NominatimGeocoder::new(config)?;
    let router = OsrmWalkingRouter::new(config)?;
    Ok(RoutingCaches::new(
        std::sync::Arc::new(geocoder),
        std::sync::Arc::new(router),
    ))
}
