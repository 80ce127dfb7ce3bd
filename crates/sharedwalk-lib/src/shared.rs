use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::path::{shortest_path, PathOutcome};
use crate::LocationId;

/// Multiplier applied to edges leading into a node of the first walker's path.
pub const PATH_BIAS_FACTOR: f64 = 0.5;

/// Start and end identifiers for both walkers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerPair {
    pub start1: LocationId,
    pub end1: LocationId,
    pub start2: LocationId,
    pub end2: LocationId,
}

impl WalkerPair {
    pub fn new(
        start1: impl Into<LocationId>,
        end1: impl Into<LocationId>,
        start2: impl Into<LocationId>,
        end2: impl Into<LocationId>,
    ) -> Self {
        Self {
            start1: start1.into(),
            end1: end1.into(),
            start2: start2.into(),
            end2: end2.into(),
        }
    }

    /// All four identifiers in request order.
    pub fn ids(&self) -> [&str; 4] {
        [
            self.start1.as_str(),
            self.end1.as_str(),
            self.start2.as_str(),
            self.end2.as_str(),
        ]
    }
}

/// Routes for both walkers.
///
/// `second.distance()` is measured on the biased graph, so it is not the
/// physical walking distance of the second route.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedPath {
    pub first: PathOutcome,
    pub second: PathOutcome,
}

impl SharedPath {
    pub fn path1(&self) -> &[LocationId] {
        self.first.nodes()
    }

    pub fn path2(&self) -> &[LocationId] {
        self.second.nodes()
    }

    /// Biased cost of the second route, or [`crate::UNREACHABLE`].
    pub fn distance2(&self) -> f64 {
        self.second.distance()
    }
}

/// Route the first walker, then route the second on a graph that favours the
/// first walker's nodes.
///
/// Every identifier is checked before any search runs. An unreachable first
/// route leaves the second walker's graph unbiased.
pub fn find_shared_path(graph: &Graph, walkers: &WalkerPair) -> Result<SharedPath> {
    if let Some(missing) = walkers.ids().into_iter().find(|id| !graph.contains(id)) {
        return Err(Error::node_not_found(missing));
    }

    let first = shortest_path(graph, &walkers.start1, &walkers.end1)?;
    debug!(
        reachable = first.is_reachable(),
        hops = first.hops(),
        "first walker routed"
    );

    let biased = graph.biased_toward(first.nodes(), PATH_BIAS_FACTOR);
    let second = shortest_path(&biased, &walkers.start2, &walkers.end2)?;
    debug!(
        reachable = second.is_reachable(),
        hops = second.hops(),
        "second walker routed"
    );

    Ok(SharedPath { first, second })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::UNREACHABLE;

    fn graph(edges: &[(&str, &str, f64)]) -> Graph {
        let mut graph = Graph::new();
        for &(a, b, w) in edges {
            graph.add_undirected_edge(a, b, w).unwrap();
        }
        graph
    }

    #[test]
    fn second_walker_is_drawn_onto_first_path() {
        // Without bias B -> Y -> D (2.0) beats B -> X -> D (2.1).
        let graph = graph(&[
            ("A", "X", 1.0),
            ("X", "D", 1.0),
            ("B", "X", 1.1),
            ("B", "Y", 1.0),
            ("Y", "D", 1.0),
        ]);
        let walkers = WalkerPair::new("A", "D", "B", "D");

        let shared = find_shared_path(&graph, &walkers).unwrap();

        assert_eq!(shared.path1(), ["A", "X", "D"]);
        assert_eq!(shared.path2(), ["B", "X", "D"]);
        assert!((shared.distance2() - 1.05).abs() < 1e-9);
    }

    #[test]
    fn input_graph_is_not_mutated() {
        let graph = graph(&[("A", "B", 1.0), ("B", "C", 1.0)]);
        let before = graph.clone();
        find_shared_path(&graph, &WalkerPair::new("A", "C", "C", "A")).unwrap();
        assert_eq!(graph, before);
    }

    #[test]
    fn unreachable_second_walker() {
        let mut graph = graph(&[("A", "B", 1.0)]);
        graph.add_node("Z");

        let shared = find_shared_path(&graph, &WalkerPair::new("A", "B", "A", "Z")).unwrap();

        assert_eq!(shared.second, PathOutcome::Unreachable);
        assert_eq!(shared.distance2(), UNREACHABLE);
    }

    #[test]
    fn unreachable_first_walker_adds_no_bias() {
        let mut graph = graph(&[("B", "C", 2.0)]);
        graph.add_node("A");

        let shared = find_shared_path(&graph, &WalkerPair::new("A", "C", "B", "C")).unwrap();

        assert!(!shared.first.is_reachable());
        assert_eq!(shared.distance2(), 2.0);
    }

    #[test]
    fn checks_every_identifier_before_solving() {
        let graph = graph(&[("A", "B", 1.0)]);
        let err = find_shared_path(&graph, &WalkerPair::new("A", "B", "A", "Q")).unwrap_err();
        assert!(matches!(err, Error::NodeNotFound { ref id, .. } if id == "Q"));
    }
}
