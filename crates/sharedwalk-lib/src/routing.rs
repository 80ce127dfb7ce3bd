use serde::Serialize;
use tracing::info;

use crate::cache::RoutingCaches;
use crate::error::{Error, Result};
use crate::geo::is_reachable;
use crate::graph::{build_graph, DroppedLocation, GraphBuild, GraphBuildOptions};
use crate::shared::{find_shared_path, SharedPath, WalkerPair};
use crate::{LocationId, Locations};

/// High-level shared route request.
#[derive(Debug, Clone)]
pub struct SharedRouteRequest {
    pub locations: Locations,
    pub walkers: WalkerPair,
    pub options: GraphBuildOptions,
}

impl SharedRouteRequest {
    pub fn new(locations: Locations, walkers: WalkerPair) -> Self {
        Self {
            locations,
            walkers,
            options: GraphBuildOptions::default(),
        }
    }

    /// Identifiers that name no supplied location, in request order.
    pub fn unknown_ids(&self) -> Vec<&str> {
        let mut unknown: Vec<&str> = Vec::new();
        for id in self.walkers.ids() {
            if !self.locations.contains_key(id) && !unknown.contains(&id) {
                unknown.push(id);
            }
        }
        unknown
    }
}

/// Planned routes plus the graph they were computed on.
#[derive(Debug, Clone)]
pub struct SharedRoutePlan {
    pub build: GraphBuild,
    pub shared: SharedPath,
}

impl SharedRoutePlan {
    pub fn path1(&self) -> &[LocationId] {
        self.shared.path1()
    }

    pub fn path2(&self) -> &[LocationId] {
        self.shared.path2()
    }

    pub fn distance2(&self) -> f64 {
        self.shared.distance2()
    }

    pub fn dropped(&self) -> &[DroppedLocation] {
        &self.build.dropped
    }

    /// Serializable view with `distance2` as `None` when unreachable.
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            path1: self.path1().to_vec(),
            path2: self.path2().to_vec(),
            distance2: Some(self.distance2()).filter(|d| is_reachable(*d)),
            reachable1: self.shared.first.is_reachable(),
            reachable2: self.shared.second.is_reachable(),
            dropped: self.build.dropped.clone(),
        }
    }
}

/// JSON friendly summary of a [`SharedRoutePlan`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub path1: Vec<LocationId>,
    pub path2: Vec<LocationId>,
    pub distance2: Option<f64>,
    pub reachable1: bool,
    pub reachable2: bool,
    pub dropped: Vec<DroppedLocation>,
}

/// Build the graph for the request and route both walkers over it.
///
/// [`Error::NodeNotFound`] carries the drop reason when the missing identifier
/// was supplied but could not be placed on the graph.
pub fn plan_shared_route(
    caches: &RoutingCaches,
    request: &SharedRouteRequest,
) -> Result<SharedRoutePlan> {
    let build = build_graph(&request.locations, caches, &request.options);

    let shared = match find_shared_path(&build.graph, &request.walkers) {
        Ok(shared) => shared,
        Err(Error::NodeNotFound { id, dropped: None }) => {
            let dropped = build.drop_reason(&id);
            return Err(Error::NodeNotFound { id, dropped });
        }
        Err(err) => return Err(err),
    };

    info!(
        path1 = ?shared.path1(),
        path2 = ?shared.path2(),
        distance2 = shared.distance2(),
        "shared route planned"
    );

    Ok(SharedRoutePlan { build, shared })
}
