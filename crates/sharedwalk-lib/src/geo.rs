use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Distance sentinel for "no known finite walking route".
///
/// Compares greater than every real distance and never produces an edge.
pub const UNREACHABLE: f64 = f64::INFINITY;

const MILES_PER_KILOMETER: f64 = 0.621371;

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Position formatted as `lon,lat`, the order OSRM expects in a path segment.
    pub fn lon_lat(&self) -> String {
        format!("{},{}", self.lon, self.lat)
    }
}

// Coordinates are cache keys; compare by bit pattern so the key is total.
impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.lat.to_bits());
        state.write_u64(self.lon.to_bits());
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Convert a distance in meters to statute miles.
pub fn meters_to_miles(meters: f64) -> f64 {
    meters / 1000.0 * MILES_PER_KILOMETER
}

/// `true` when `distance` is a usable edge weight.
pub fn is_reachable(distance: f64) -> bool {
    distance.is_finite() && distance >= 0.0
}
