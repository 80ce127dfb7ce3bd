//! Deterministic fake providers for tests.
//!
//! Compiled for this crate's unit tests and, behind the `test-utils` feature,
//! for dependent crates that need an engine without network access.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::ProviderError;
use crate::geo::Coordinate;
use crate::provider::{Geocoder, WalkingRouter};
use crate::Locations;

/// Geocoder answering from a fixed address table and counting calls.
#[derive(Default)]
pub struct FakeGeocoder {
    known: HashMap<String, Coordinate>,
    failing: HashSet<String>,
    calls: Mutex<HashMap<String, usize>>,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, address: &str, lat: f64, lon: f64) -> Self {
        self.known
            .insert(address.to_string(), Coordinate::new(lat, lon));
        self
    }

    /// Make lookups of `address` fail as if the provider timed out.
    #[must_use]
    pub fn failing(mut self, address: &str) -> Self {
        self.failing.insert(address.to_string());
        self
    }

    pub fn calls(&self, address: &str) -> usize {
        self.calls.lock().get(address).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

impl Geocoder for FakeGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, ProviderError> {
        *self.calls.lock().entry(address.to_string()).or_insert(0) += 1;
        if self.failing.contains(address) {
            return Err(ProviderError::Unavailable("geocoder timed out".to_string()));
        }
        Ok(self.known.get(address).copied())
    }
}

/// Walking router with a symmetric distance table.
///
/// Pairs without an entry have no walking route. Geometry is the straight
/// polyline through the waypoints unless disabled.
pub struct FakeRouter {
    distances: HashMap<(Coordinate, Coordinate), f64>,
    failing: HashSet<(Coordinate, Coordinate)>,
    geometry: bool,
    distance_calls: AtomicUsize,
    geometry_calls: AtomicUsize,
}

impl Default for FakeRouter {
    fn default() -> Self {
        Self {
            distances: HashMap::new(),
            failing: HashSet::new(),
            geometry: true,
            distance_calls: AtomicUsize::new(0),
            geometry_calls: AtomicUsize::new(0),
        }
    }
}

impl FakeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_distance(mut self, a: Coordinate, b: Coordinate, miles: f64) -> Self {
        self.distances.insert((a, b), miles);
        self.distances.insert((b, a), miles);
        self
    }

    #[must_use]
    pub fn failing_between(mut self, a: Coordinate, b: Coordinate) -> Self {
        self.failing.insert((a, b));
        self.failing.insert((b, a));
        self
    }

    #[must_use]
    pub fn without_geometry(mut self) -> Self {
        self.geometry = false;
        self
    }

    pub fn distance_calls(&self) -> usize {
        self.distance_calls.load(Ordering::SeqCst)
    }

    pub fn geometry_calls(&self) -> usize {
        self.geometry_calls.load(Ordering::SeqCst)
    }
}

impl WalkingRouter for FakeRouter {
    fn walking_distance(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Option<f64>, ProviderError> {
        self.distance_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&(from, to)) {
            return Err(ProviderError::Unavailable("router timed out".to_string()));
        }
        Ok(self.distances.get(&(from, to)).copied())
    }

    fn route_geometry(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<Option<Vec<Coordinate>>, ProviderError> {
        self.geometry_calls.fetch_add(1, Ordering::SeqCst);
        if !self.geometry || waypoints.len() < 2 {
            return Ok(None);
        }
        Ok(Some(waypoints.to_vec()))
    }
}

/// Addresses used by the Davis fixture.
pub mod davis {
    pub const UC_DAVIS: &str = "1 Shields Ave, Davis, CA";
    pub const DOWNTOWN: &str = "500 1st St, Davis, CA";
    pub const NOWHERE: &str = "123 Nonexistent Rd, Atlantis";
    pub const DAVIS_COMMONS: &str = "2001 2nd St, Davis, CA";
    pub const TRADER_JOES: &str = "2191 Cowell Blvd, Davis, CA";
}

/// Four-location fixture where `C` cannot be geocoded.
///
/// Distances: A-B 0.8, B-D 0.9, A-D 2.0, A-E 2.5, B-E 2.2, D-E 1.1.
pub fn davis_fixture() -> (Locations, FakeGeocoder, FakeRouter) {
    let a = Coordinate::new(38.5382, -121.7617);
    let b = Coordinate::new(38.5435, -121.7405);
    let d = Coordinate::new(38.5476, -121.7330);
    let e = Coordinate::new(38.5390, -121.7240);

    let locations: Locations = [
        ("A", davis::UC_DAVIS),
        ("B", davis::DOWNTOWN),
        ("C", davis::NOWHERE),
        ("D", davis::DAVIS_COMMONS),
        ("E", davis::TRADER_JOES),
    ]
    .into_iter()
    .map(|(id, address)| (id.to_string(), address.to_string()))
    .collect();

    let geocoder = FakeGeocoder::new()
        .with(davis::UC_DAVIS, a.lat, a.lon)
        .with(davis::DOWNTOWN, b.lat, b.lon)
        .with(davis::DAVIS_COMMONS, d.lat, d.lon)
        .with(davis::TRADER_JOES, e.lat, e.lon);

    let router = FakeRouter::new()
        .with_distance(a, b, 0.8)
        .with_distance(b, d, 0.9)
        .with_distance(a, d, 2.0)
        .with_distance(a, e, 2.5)
        .with_distance(b, e, 2.2)
        .with_distance(d, e, 1.1);

    (locations, geocoder, router)
}
