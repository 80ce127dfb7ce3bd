mod common;

use common::{chain_town, ids};
use sharedwalk_lib::{
    build_graph, find_shared_path, shortest_path, Error, Graph, GraphBuildOptions, PathOutcome,
    WalkerPair, PATH_BIAS_FACTOR, UNREACHABLE,
};

fn chain_graph() -> Graph {
    let town = chain_town();
    build_graph(&town.locations, &town.caches, &GraphBuildOptions::default()).graph
}

#[test]
fn dijkstra_prefers_cheaper_detour() {
    let graph = chain_graph();

    let outcome = shortest_path(&graph, "A", "D").unwrap();

    assert_eq!(ids(outcome.nodes()), vec!["A", "B", "C", "D"]);
    assert_eq!(outcome.distance(), 3.0);
}

#[test]
fn solver_keeps_no_state_between_calls() {
    let graph = chain_graph();

    let first = shortest_path(&graph, "A", "D").unwrap();
    let other = shortest_path(&graph, "D", "B").unwrap();
    let again = shortest_path(&graph, "A", "D").unwrap();

    assert_eq!(first, again);
    assert_eq!(ids(other.nodes()), vec!["D", "C", "B"]);
    assert_eq!(other.distance(), 2.0);
}

#[test]
fn bias_only_discounts_edges_into_the_first_path() {
    let mut graph = Graph::new();
    for (a, b, w) in [
        ("A", "B", 1.0),
        ("B", "C", 1.0),
        ("X", "B", 2.0),
        ("X", "Y", 0.5),
    ] {
        graph.add_undirected_edge(a, b, w).unwrap();
    }
    let path = vec!["A".to_string(), "B".to_string(), "C".to_string()];

    let biased = graph.biased_toward(&path, PATH_BIAS_FACTOR);

    assert_eq!(biased.weight("X", "B"), Some(1.0));
    assert_eq!(biased.weight("B", "X"), Some(2.0));
    assert_eq!(biased.weight("X", "Y"), Some(0.5));
    assert_eq!(biased.weight("A", "B"), Some(0.5));
    assert_eq!(graph.weight("X", "B"), Some(2.0));
}

#[test]
fn second_walker_distance_uses_biased_weights() {
    let graph = chain_graph();

    let shared = find_shared_path(&graph, &WalkerPair::new("A", "C", "B", "D")).unwrap();

    assert_eq!(ids(shared.path1()), vec!["A", "B", "C"]);
    assert_eq!(ids(shared.path2()), vec!["B", "C", "D"]);
    // B -> C is discounted because C lies on the first path; C -> D is not.
    assert_eq!(shared.distance2(), 1.5);
}

#[test]
fn unreachable_second_walker_reports_sentinel() {
    let mut graph = chain_graph();
    graph.add_node("Island");

    let shared = find_shared_path(&graph, &WalkerPair::new("A", "D", "B", "Island")).unwrap();

    assert_eq!(shared.second, PathOutcome::Unreachable);
    assert_eq!(shared.distance2(), UNREACHABLE);
    assert!(shared.path2().is_empty());
    assert_eq!(ids(shared.path1()), vec!["A", "B", "C", "D"]);
}

#[test]
fn missing_node_is_an_error_not_unreachable() {
    let graph = chain_graph();

    let err = find_shared_path(&graph, &WalkerPair::new("A", "D", "Q", "D")).unwrap_err();

    match err {
        Error::NodeNotFound { id, dropped } => {
            assert_eq!(id, "Q");
            assert_eq!(dropped, None);
        }
        other => panic!("unexpected error: {other}"),
    }
}
