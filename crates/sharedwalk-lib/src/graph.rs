use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::RoutingCaches;
use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::{LocationId, Locations};

/// Walking distance above which two locations are not connected.
pub const MAX_EDGE_MILES: f64 = 10.0;

/// Options controlling graph construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphBuildOptions {
    /// Inclusive edge threshold in miles.
    pub max_edge_miles: f64,
}

impl Default for GraphBuildOptions {
    fn default() -> Self {
        Self {
            max_edge_miles: MAX_EDGE_MILES,
        }
    }
}

/// Why a supplied location did not become a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    EmptyAddress,
    Unresolved,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            DropReason::EmptyAddress => "address is empty",
            DropReason::Unresolved => "address could not be geocoded",
        };
        f.write_str(value)
    }
}

/// A location left out of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedLocation {
    pub id: LocationId,
    pub address: String,
    pub reason: DropReason,
}

/// Weighted walking graph keyed by location identifier.
///
/// Built graphs are undirected. Derived graphs such as
/// [`Graph::biased_toward`] may carry different weights per direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    adjacency: HashMap<LocationId, HashMap<LocationId, f64>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an isolated node; no-op when it already exists.
    pub fn add_node(&mut self, id: impl Into<LocationId>) {
        self.adjacency.entry(id.into()).or_default();
    }

    /// Insert `a -> b` and `b -> a` with the same weight, creating the nodes
    /// when needed.
    pub fn add_undirected_edge(
        &mut self,
        a: impl Into<LocationId>,
        b: impl Into<LocationId>,
        weight: f64,
    ) -> Result<()> {
        let a = a.into();
        let b = b.into();
        if a == b {
            return Err(Error::InvalidEdge {
                from: a,
                to: b,
                message: "self edges are not allowed".to_string(),
            });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidEdge {
                from: a,
                to: b,
                message: format!("weight must be finite and non-negative, got {}", weight),
            });
        }

        self.adjacency
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), weight);
        self.adjacency.entry(b).or_default().insert(a, weight);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Weight of the directed edge `from -> to`.
    pub fn weight(&self, from: &str, to: &str) -> Option<f64> {
        self.adjacency.get(from).and_then(|edges| edges.get(to)).copied()
    }

    /// Return the outgoing edges of `id`; empty for unknown nodes.
    pub fn neighbours<'a>(&'a self, id: &str) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.adjacency
            .get(id)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(target, &weight)| (target.as_str(), weight)))
    }

    /// Node identifiers in sorted order.
    pub fn nodes(&self) -> Vec<&str> {
        let mut nodes: Vec<&str> = self.adjacency.keys().map(String::as_str).collect();
        nodes.sort_unstable();
        nodes
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(HashMap::len).sum()
    }

    /// `true` when every edge has a reverse edge of equal weight.
    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().all(|(from, edges)| {
            edges
                .iter()
                .all(|(to, &weight)| self.weight(to, from) == Some(weight))
        })
    }

    /// Derive a graph where every edge pointing at a node of `path` is scaled
    /// by `factor`.
    ///
    /// Only the destination endpoint is checked, so `u -> v` and `v -> u`
    /// differ when exactly one of them lies on `path`. `self` is untouched.
    pub fn biased_toward(&self, path: &[LocationId], factor: f64) -> Graph {
        let on_path: HashSet<&str> = path.iter().map(String::as_str).collect();
        let adjacency = self
            .adjacency
            .iter()
            .map(|(node, edges)| {
                let biased = edges
                    .iter()
                    .map(|(target, &weight)| {
                        let weight = if on_path.contains(target.as_str()) {
                            weight * factor
                        } else {
                            weight
                        };
                        (target.clone(), weight)
                    })
                    .collect();
                (node.clone(), biased)
            })
            .collect();
        Graph { adjacency }
    }
}

/// Result of [`build_graph`]: the graph plus what the builder learned on the way.
#[derive(Debug, Clone, Default)]
pub struct GraphBuild {
    pub graph: Graph,
    /// Coordinates of every graph node.
    pub coordinates: BTreeMap<LocationId, Coordinate>,
    /// Supplied locations that did not become nodes.
    pub dropped: Vec<DroppedLocation>,
}

impl GraphBuild {
    /// Why `id` is missing from the graph, if it was supplied but dropped.
    pub fn drop_reason(&self, id: &str) -> Option<DropReason> {
        self.dropped
            .iter()
            .find(|dropped| dropped.id == id)
            .map(|dropped| dropped.reason)
    }
}

/// Build the walking graph for `locations`.
///
/// Every location is geocoded through the cache; failures are dropped and
/// reported. Each unordered pair of resolved locations is looked up exactly
/// once, in identifier order, and becomes an edge in both directions when its
/// walking distance is within `options.max_edge_miles`.
pub fn build_graph(
    locations: &Locations,
    caches: &RoutingCaches,
    options: &GraphBuildOptions,
) -> GraphBuild {
    let mut build = GraphBuild::default();

    info!(locations = locations.len(), "resolving coordinates");
    for (id, address) in locations {
        if address.trim().is_empty() {
            debug!(id = %id, "skipping location with empty address");
            build.dropped.push(DroppedLocation {
                id: id.clone(),
                address: address.clone(),
                reason: DropReason::EmptyAddress,
            });
            continue;
        }

        match caches.geocodes.resolve(address) {
            Some(coordinate) => {
                debug!(id = %id, address = %address, %coordinate, "resolved location");
                build.coordinates.insert(id.clone(), coordinate);
                build.graph.add_node(id.clone());
            }
            None => {
                info!(id = %id, address = %address, "could not resolve location");
                build.dropped.push(DroppedLocation {
                    id: id.clone(),
                    address: address.clone(),
                    reason: DropReason::Unresolved,
                });
            }
        }
    }

    let resolved: Vec<(&LocationId, &Coordinate)> = build.coordinates.iter().collect();
    let total_pairs = resolved.len() * resolved.len().saturating_sub(1) / 2;
    info!(pairs = total_pairs, "calculating walking distances");

    let mut current_pair = 0;
    for (i, &(from_id, from)) in resolved.iter().enumerate() {
        for &(to_id, to) in &resolved[i + 1..] {
            current_pair += 1;
            debug!("calculating distance {}/{}", current_pair, total_pairs);

            let miles = caches.distances.walking_distance(*from, *to);
            if miles <= options.max_edge_miles {
                // Cache values are finite and non-negative whenever they pass
                // the threshold, so insertion cannot fail.
                if let Err(err) = build
                    .graph
                    .add_undirected_edge(from_id.clone(), to_id.clone(), miles)
                {
                    debug!(error = %err, "skipping invalid edge");
                }
            }
        }
    }

    info!(
        nodes = build.graph.node_count(),
        edges = build.graph.edge_count() / 2,
        dropped = build.dropped.len(),
        "walking graph built"
    );

    build
}
