use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::error::{Error, Result};
use crate::geo::UNREACHABLE;
use crate::graph::Graph;
use crate::LocationId;

/// Result of a single shortest-path query.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOutcome {
    /// `nodes` runs from start to end inclusive.
    Found { nodes: Vec<LocationId>, distance: f64 },
    /// Both endpoints exist but no path connects them.
    Unreachable,
}

impl PathOutcome {
    /// Total path weight, or [`UNREACHABLE`].
    pub fn distance(&self) -> f64 {
        match self {
            PathOutcome::Found { distance, .. } => *distance,
            PathOutcome::Unreachable => UNREACHABLE,
        }
    }

    /// Path nodes; empty when unreachable.
    pub fn nodes(&self) -> &[LocationId] {
        match self {
            PathOutcome::Found { nodes, .. } => nodes,
            PathOutcome::Unreachable => &[],
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, PathOutcome::Found { .. })
    }

    /// Number of edges walked.
    pub fn hops(&self) -> usize {
        self.nodes().len().saturating_sub(1)
    }

    pub fn into_nodes(self) -> Vec<LocationId> {
        match self {
            PathOutcome::Found { nodes, .. } => nodes,
            PathOutcome::Unreachable => Vec::new(),
        }
    }
}

/// Run Dijkstra's algorithm from `start` to `end`.
///
/// Returns [`Error::NodeNotFound`] when either endpoint is missing from
/// `graph`. All search state is local to the call.
pub fn shortest_path(graph: &Graph, start: &str, end: &str) -> Result<PathOutcome> {
    for id in [start, end] {
        if !graph.contains(id) {
            return Err(Error::node_not_found(id));
        }
    }

    if start == end {
        return Ok(PathOutcome::Found {
            nodes: vec![start.to_string()],
            distance: 0.0,
        });
    }

    let mut distances: HashMap<&str, f64> = HashMap::with_capacity(graph.node_count());
    let mut parents: HashMap<&str, &str> = HashMap::new();
    let mut settled: HashSet<&str> = HashSet::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start, 0.0);
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        if !settled.insert(entry.node) {
            continue;
        }

        if entry.node == end {
            let nodes = reconstruct_path(&parents, start, end);
            return Ok(PathOutcome::Found {
                nodes,
                distance: entry.cost.0,
            });
        }

        let current_distance = entry.cost.0;
        for (next, weight) in graph.neighbours(entry.node) {
            if settled.contains(next) {
                continue;
            }

            let next_cost = current_distance + weight;
            if next_cost < *distances.get(next).unwrap_or(&UNREACHABLE) {
                distances.insert(next, next_cost);
                parents.insert(next, entry.node);
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    Ok(PathOutcome::Unreachable)
}

fn reconstruct_path(parents: &HashMap<&str, &str>, start: &str, goal: &str) -> Vec<LocationId> {
    let mut path = vec![goal.to_string()];
    let mut current = goal;
    while current != start {
        match parents.get(current) {
            Some(&parent) => {
                path.push(parent.to_string());
                current = parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry<'a> {
    node: &'a str,
    cost: FloatOrd,
}

impl<'a> QueueEntry<'a> {
    fn new(node: &'a str, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost; ties broken by identifier for deterministic output.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(self.node))
    }
}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
