//! Collaborator interfaces consumed by the engine.
//!
//! The graph builder and the route map only ever talk to these traits, so the
//! engine can be exercised with deterministic fakes. [`crate::nominatim`] and
//! [`crate::osrm`] provide the HTTP implementations used in production.

use std::env;
use std::time::Duration;

use crate::error::{Error, ProviderError, Result};
use crate::geo::Coordinate;

const NOMINATIM_URL_ENV: &str = "SHAREDWALK_NOMINATIM_URL";
const OSRM_URL_ENV: &str = "SHAREDWALK_OSRM_URL";
const USER_AGENT_ENV: &str = "SHAREDWALK_USER_AGENT";
const TIMEOUT_ENV: &str = "SHAREDWALK_TIMEOUT_SECS";

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_OSRM_URL: &str = "http://router.project-osrm.org";
pub const DEFAULT_USER_AGENT: &str = "sharedwalk_path_finder";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves free-text addresses to coordinates.
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` means the provider answered but found no match.
    fn geocode(&self, address: &str) -> std::result::Result<Option<Coordinate>, ProviderError>;
}

/// Walking distance and route geometry lookups.
pub trait WalkingRouter: Send + Sync {
    /// Walking distance in miles. `Ok(None)` means no walking route exists.
    fn walking_distance(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> std::result::Result<Option<f64>, ProviderError>;

    /// Street-level geometry of a walk visiting `waypoints` in order.
    fn route_geometry(
        &self,
        waypoints: &[Coordinate],
    ) -> std::result::Result<Option<Vec<Coordinate>>, ProviderError>;
}

/// Endpoints and limits for the HTTP providers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub nominatim_url: String,
    pub osrm_url: String,
    pub user_agent: String,
    /// Per-call timeout; there is no retry.
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            osrm_url: DEFAULT_OSRM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProviderConfig {
    /// Create configuration from environment variables.
    ///
    /// - `SHAREDWALK_NOMINATIM_URL`: geocoder base URL
    /// - `SHAREDWALK_OSRM_URL`: walking router base URL
    /// - `SHAREDWALK_USER_AGENT`: User-Agent sent to the geocoder
    /// - `SHAREDWALK_TIMEOUT_SECS`: per-call timeout in seconds (default 10)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ProviderConfig::from_env`] but reads values through `lookup`,
    /// so tests do not have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = non_empty(lookup(NOMINATIM_URL_ENV)) {
            config.nominatim_url = trim_trailing_slash(url);
        }
        if let Some(url) = non_empty(lookup(OSRM_URL_ENV)) {
            config.osrm_url = trim_trailing_slash(url);
        }
        if let Some(agent) = non_empty(lookup(USER_AGENT_ENV)) {
            config.user_agent = agent;
        }
        if let Some(raw) = non_empty(lookup(TIMEOUT_ENV)) {
            let secs: u64 = raw.trim().parse().map_err(|_| Error::InvalidConfig {
                key: TIMEOUT_ENV.to_string(),
                message: format!("expected a whole number of seconds, got '{}'", raw),
            })?;
            if secs == 0 {
                return Err(Error::InvalidConfig {
                    key: TIMEOUT_ENV.to_string(),
                    message: "timeout must be at least one second".to_string(),
                });
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Blocking HTTP client shared by both providers.
    pub fn http_client(&self) -> Result<reqwest::blocking::Client> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout)
            .build()?;
        Ok(client)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn trim_trailing_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
