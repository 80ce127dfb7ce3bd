use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ProviderError, Result};
use crate::geo::Coordinate;
use crate::provider::{Geocoder, ProviderConfig};

const SEARCH_PATH: &str = "/search";

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

/// Geocoder backed by a Nominatim search endpoint.
pub struct NominatimGeocoder {
    base_url: String,
    client: Client,
}

impl NominatimGeocoder {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.nominatim_url.clone(),
            client: config.http_client()?,
        })
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, address: &str) -> std::result::Result<Option<Coordinate>, ProviderError> {
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        debug!(address, "geocoding address");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().unwrap_or_default();
            return Err(ProviderError::Api { status, message });
        }

        let results: Vec<SearchResult> = response.json()?;
        results
            .into_iter()
            .next()
            .map(|result| parse_result(&result))
            .transpose()
    }
}

fn parse_result(result: &SearchResult) -> std::result::Result<Coordinate, ProviderError> {
    let lat = result
        .lat
        .parse::<f64>()
        .map_err(|_| ProviderError::Malformed(format!("latitude '{}'", result.lat)))?;
    let lon = result
        .lon
        .parse::<f64>()
        .map_err(|_| ProviderError::Malformed(format!("longitude '{}'", result.lon)))?;
    if !lat.is_finite() || lat.abs() > 90.0 {
        return Err(ProviderError::Malformed(format!("latitude '{}'", result.lat)));
    }
    if !lon.is_finite() || lon.abs() > 180.0 {
        return Err(ProviderError::Malformed(format!("longitude '{}'", result.lon)));
    }
    Ok(Coordinate::new(lat, lon))
}
