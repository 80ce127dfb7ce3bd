use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ProviderError, Result};
use crate::geo::{meters_to_miles, Coordinate};
use crate::provider::{ProviderConfig, WalkingRouter};

pub const OSRM_FOOT_ROUTE_PATH: &str = "/route/v1/foot/";

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
    /// HTTP status the body arrived with.
    #[serde(skip)]
    status: u16,
}

#[derive(Debug, Deserialize)]
struct Route {
    /// Distance in meters
    distance: f64,
    geometry: Option<LineString>,
}

#[derive(Debug, Deserialize)]
struct LineString {
    /// `[lon, lat]` pairs
    coordinates: Vec<[f64; 2]>,
}

/// Walking router backed by the OSRM `route` service with the foot profile.
pub struct OsrmWalkingRouter {
    base_url: String,
    client: Client,
}

impl OsrmWalkingRouter {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.osrm_url.clone(),
            client: config.http_client()?,
        })
    }

    fn route_url(&self, waypoints: &[Coordinate]) -> String {
        let mut url = self.base_url.clone();
        url.push_str(OSRM_FOOT_ROUTE_PATH);
        let segments: Vec<String> = waypoints.iter().map(Coordinate::lon_lat).collect();
        url.push_str(&segments.join(";"));
        url
    }

    fn fetch(
        &self,
        waypoints: &[Coordinate],
        query: &[(&str, &str)],
    ) -> std::result::Result<RouteResponse, ProviderError> {
        let response = self.client.get(self.route_url(waypoints)).query(query).send()?;

        // OSRM answers "no route" with a 400 and a JSON body carrying the code.
        let status = response.status();
        let body = response.text()?;
        match serde_json::from_str::<RouteResponse>(&body) {
            Ok(mut parsed) => {
                parsed.status = status.as_u16();
                Ok(parsed)
            }
            Err(_) if !status.is_success() => Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            }),
            Err(err) => Err(ProviderError::Malformed(err.to_string())),
        }
    }
}

impl WalkingRouter for OsrmWalkingRouter {
    fn walking_distance(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> std::result::Result<Option<f64>, ProviderError> {
        debug!(%from, %to, "requesting walking distance");
        let response = self.fetch(&[from, to], &[("overview", "false")])?;
        Ok(first_route(response)?.map(|route| meters_to_miles(route.distance)))
    }

    fn route_geometry(
        &self,
        waypoints: &[Coordinate],
    ) -> std::result::Result<Option<Vec<Coordinate>>, ProviderError> {
        if waypoints.len() < 2 {
            return Ok(None);
        }
        let response = self.fetch(
            waypoints,
            &[("overview", "full"), ("geometries", "geojson")],
        )?;
        Ok(first_route(response)?
            .and_then(|route| route.geometry)
            .map(|line| {
                line.coordinates
                    .into_iter()
                    .map(|[lon, lat]| Coordinate::new(lat, lon))
                    .collect()
            }))
    }
}

/// `Ok(None)` only when OSRM reports that no route exists. Any other non-`Ok`
/// code is a provider failure and must not be cached as unreachable.
fn first_route(response: RouteResponse) -> std::result::Result<Option<Route>, ProviderError> {
    match response.code.as_str() {
        "Ok" => Ok(response.routes.into_iter().next()),
        "NoRoute" | "NoSegment" => Ok(None),
        code => Err(ProviderError::Api {
            status: response.status,
            message: match response.message {
                Some(message) => format!("{code}: {message}"),
                None => code.to_string(),
            },
        }),
    }
}
