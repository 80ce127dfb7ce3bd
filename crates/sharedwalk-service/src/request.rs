//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};

use sharedwalk_lib::{Locations, SharedRouteRequest, WalkerPair};

use crate::ProblemDetails;

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a `ProblemDetails`
/// error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Body of `POST /api/shortest-path`.
///
/// Every field is optional at the serde layer so that missing data is
/// reported as a problem response rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShortestPathRequest {
    #[serde(default)]
    pub locations: Option<Locations>,
    #[serde(default)]
    pub start1: Option<String>,
    #[serde(default)]
    pub end1: Option<String>,
    #[serde(default)]
    pub start2: Option<String>,
    #[serde(default)]
    pub end2: Option<String>,

    /// Render the Leaflet map into the response.
    #[serde(default)]
    pub include_map: Option<bool>,
}

impl ShortestPathRequest {
    fn endpoints(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("start1", self.start1.as_deref()),
            ("end1", self.end1.as_deref()),
            ("start2", self.start2.as_deref()),
            ("end2", self.end2.as_deref()),
        ]
    }

    /// Whether the response should carry `map_html`. Defaults to `true`.
    pub fn wants_map(&self) -> bool {
        self.include_map.unwrap_or(true)
    }

    /// Convert a validated body into an engine request.
    ///
    /// Location keys and endpoint identifiers are both trimmed; missing values
    /// become empty strings, which [`Validate::validate`] rejects beforehand.
    pub fn to_route_request(&self) -> SharedRouteRequest {
        let id = |value: &Option<String>| value.as_deref().unwrap_or_default().trim().to_string();
        let locations = self
            .locations
            .iter()
            .flatten()
            .map(|(key, address)| (key.trim().to_string(), address.clone()))
            .collect();
        SharedRouteRequest::new(
            locations,
            WalkerPair::new(
                id(&self.start1),
                id(&self.end1),
                id(&self.start2),
                id(&self.end2),
            ),
        )
    }
}

impl Validate for ShortestPathRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        let Some(locations) = self.locations.as_ref().filter(|l| !l.is_empty()) else {
            return Err(Box::new(ProblemDetails::missing_data(
                "The 'locations' field is required and cannot be empty",
                request_id,
            )));
        };

        if locations.len() < 2 {
            return Err(Box::new(ProblemDetails::missing_data(
                "At least two locations are required",
                request_id,
            )));
        }

        if locations.keys().any(|id| id.trim().is_empty()) {
            return Err(Box::new(ProblemDetails::missing_data(
                "Location identifiers cannot be empty",
                request_id,
            )));
        }

        let mut seen = std::collections::HashSet::new();
        if let Some(id) = locations.keys().map(|id| id.trim()).find(|id| !seen.insert(*id)) {
            return Err(Box::new(ProblemDetails::missing_data(
                format!("Location '{}' is given more than once", id),
                request_id,
            )));
        }

        if let Some((id, _)) = locations.iter().find(|(_, address)| address.trim().is_empty()) {
            return Err(Box::new(ProblemDetails::missing_data(
                format!("The address for location '{}' cannot be empty", id),
                request_id,
            )));
        }

        for (field, value) in self.endpoints() {
            if value.map(str::trim).unwrap_or_default().is_empty() {
                return Err(Box::new(ProblemDetails::missing_data(
                    format!("The '{}' field is required and cannot be empty", field),
                    request_id,
                )));
            }
        }

        Ok(())
    }
}
