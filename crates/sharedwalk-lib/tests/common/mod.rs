//! Table-backed providers for the integration tests.
//!
//! `sharedwalk_lib::test_helpers` only compiles under `cfg(test)` of the
//! library itself or with the `test-utils` feature, and integration tests
//! build against the plain library. These fakes are keyed by location id
//! rather than by fixed Davis addresses, so each test declares its own town.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use sharedwalk_lib::{
    Coordinate, Geocoder, Locations, ProviderError, RoutingCaches, WalkingRouter,
};

/// Street address used for a fixture location.
pub fn address(id: &str) -> String {
    format!("{id} Main St, Springfield")
}

/// Geocoder backed by a table, optionally failing the first lookup of some
/// addresses.
#[derive(Default)]
pub struct TableGeocoder {
    table: HashMap<String, Coordinate>,
    flaky: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

impl TableGeocoder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for TableGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.flaky.lock().remove(address) {
            return Err(ProviderError::Unavailable("connection reset".into()));
        }
        Ok(self.table.get(address).copied())
    }
}

/// Router backed by a symmetric table of walking distances in miles.
#[derive(Default)]
pub struct TableRouter {
    table: HashMap<(Coordinate, Coordinate), f64>,
    calls: AtomicUsize,
}

impl TableRouter {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WalkingRouter for TableRouter {
    fn walking_distance(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Option<f64>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.table.get(&(from, to)).copied())
    }

    fn route_geometry(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<Option<Vec<Coordinate>>, ProviderError> {
        Ok(Some(waypoints.to_vec()))
    }
}

/// A small town of named places and the walks between them.
pub struct Town {
    pub locations: Locations,
    pub caches: RoutingCaches,
    pub geocoder: Arc<TableGeocoder>,
    pub router: Arc<TableRouter>,
}

#[derive(Default)]
pub struct TownBuilder {
    locations: Locations,
    coordinates: HashMap<String, Coordinate>,
    geocoder: TableGeocoder,
    router: TableRouter,
}

impl TownBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A place the geocoder can find. Coordinates only need to be distinct.
    pub fn place(mut self, id: &str) -> Self {
        let n = self.locations.len() as f64;
        let coordinate = Coordinate::new(40.0 + n * 0.001, -75.0 - n * 0.001);
        self.locations.insert(id.to_string(), address(id));
        self.coordinates.insert(id.to_string(), coordinate);
        self.geocoder.table.insert(address(id), coordinate);
        self
    }

    /// A place the geocoder answers "not found" for.
    pub fn unresolvable(mut self, id: &str) -> Self {
        self.locations.insert(id.to_string(), address(id));
        self
    }

    /// Make the first lookup of an existing place fail transiently.
    pub fn flaky(self, id: &str) -> Self {
        self.geocoder.flaky.lock().insert(address(id));
        self
    }

    /// A walk between two places, in both directions.
    pub fn walk(mut self, a: &str, b: &str, miles: f64) -> Self {
        let from = self.coordinates[a];
        let to = self.coordinates[b];
        self.router.table.insert((from, to), miles);
        self.router.table.insert((to, from), miles);
        self
    }

    pub fn build(self) -> Town {
        let geocoder = Arc::new(self.geocoder);
        let router = Arc::new(self.router);
        let caches = RoutingCaches::new(geocoder.clone(), router.clone());
        Town {
            locations: self.locations,
            caches,
            geocoder,
            router,
        }
    }
}

/// `A-B=1, B-C=1, A-C=5, C-D=1`.
pub fn chain_town() -> Town {
    TownBuilder::new()
        .place("A")
        .place("B")
        .place("C")
        .place("D")
        .walk("A", "B", 1.0)
        .walk("B", "C", 1.0)
        .walk("A", "C", 5.0)
        .walk("C", "D", 1.0)
        .build()
}

/// Ids of `path` as string slices, for terse assertions.
pub fn ids(path: &[String]) -> Vec<&str> {
    path.iter().map(String::as_str).collect()
}
