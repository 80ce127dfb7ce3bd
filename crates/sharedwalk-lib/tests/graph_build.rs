mod common;

use common::{chain_town, TownBuilder};
use sharedwalk_lib::{build_graph, DropReason, GraphBuildOptions, MAX_EDGE_MILES};

#[test]
fn built_graph_is_symmetric() {
    let town = chain_town();
    let build = build_graph(&town.locations, &town.caches, &GraphBuildOptions::default());

    assert!(build.graph.is_symmetric());
    for from in build.graph.nodes() {
        for (to, weight) in build.graph.neighbours(from) {
            assert_eq!(build.graph.weight(to, from), Some(weight));
        }
    }
    assert_eq!(build.graph.edge_count(), 8);
}

#[test]
fn edges_respect_distance_threshold() {
    let town = TownBuilder::new()
        .place("A")
        .place("B")
        .place("C")
        .place("D")
        .walk("A", "B", MAX_EDGE_MILES)
        .walk("A", "C", 10.5)
        .walk("B", "C", 3.0)
        .build();

    let build = build_graph(&town.locations, &town.caches, &GraphBuildOptions::default());

    assert_eq!(build.graph.weight("A", "B"), Some(MAX_EDGE_MILES));
    assert_eq!(build.graph.weight("A", "C"), None);
    assert_eq!(build.graph.weight("B", "C"), Some(3.0));
    // No walking route to D at all: a node without edges.
    assert!(build.graph.contains("D"));
    assert_eq!(build.graph.neighbours("D").count(), 0);
}

#[test]
fn custom_threshold_is_honoured() {
    let town = chain_town();
    let options = GraphBuildOptions {
        max_edge_miles: 2.0,
    };

    let build = build_graph(&town.locations, &town.caches, &options);

    assert_eq!(build.graph.weight("A", "C"), None);
    assert_eq!(build.graph.weight("A", "B"), Some(1.0));
}

#[test]
fn unresolved_locations_are_dropped_and_reported() {
    let town = TownBuilder::new()
        .place("A")
        .place("B")
        .unresolvable("C")
        .walk("A", "B", 0.5)
        .build();

    let build = build_graph(&town.locations, &town.caches, &GraphBuildOptions::default());

    assert_eq!(build.graph.nodes(), vec!["A", "B"]);
    assert!(!build.coordinates.contains_key("C"));
    assert_eq!(build.dropped.len(), 1);
    assert_eq!(build.dropped[0].id, "C");
    assert_eq!(build.drop_reason("C"), Some(DropReason::Unresolved));
    assert_eq!(build.drop_reason("A"), None);
}

#[test]
fn repeated_builds_reuse_cached_lookups() {
    let town = chain_town();
    let options = GraphBuildOptions::default();

    let first = build_graph(&town.locations, &town.caches, &options);
    assert_eq!(town.geocoder.calls(), 4);
    assert_eq!(town.router.calls(), 6);

    let second = build_graph(&town.locations, &town.caches, &options);
    assert_eq!(town.geocoder.calls(), 4);
    assert_eq!(town.router.calls(), 6);
    assert_eq!(first.graph, second.graph);

    let stats = town.caches.distances.stats();
    assert_eq!(stats.entries, 6);
    assert_eq!(stats.hits, 6);
}

#[test]
fn transient_geocode_failures_are_retried() {
    let town = TownBuilder::new()
        .place("A")
        .place("B")
        .flaky("B")
        .walk("A", "B", 0.5)
        .build();
    let options = GraphBuildOptions::default();

    let first = build_graph(&town.locations, &town.caches, &options);
    assert_eq!(first.drop_reason("B"), Some(DropReason::Unresolved));

    let second = build_graph(&town.locations, &town.caches, &options);
    assert!(second.graph.contains("B"));
    assert_eq!(second.graph.weight("A", "B"), Some(0.5));
    assert_eq!(town.geocoder.calls(), 3);
}
