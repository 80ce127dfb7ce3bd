//! Application state shared by the axum handlers.

use std::sync::Arc;

use sharedwalk_lib::{
    default_caches, CacheStats, Error as LibError, Geocoder, ProviderConfig, RoutingCaches,
    WalkingRouter,
};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// An environment override could not be parsed.
    Config(LibError),

    /// The HTTP provider clients could not be built.
    Providers(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid provider configuration: {}", e),
            Self::Providers(e) => write!(f, "failed to build provider clients: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) | Self::Providers(e) => Some(e),
        }
    }
}

/// Shared application state for all axum handlers.
///
/// Cheap to clone. The caches live for the whole process so repeated
/// addresses and pairs are only looked up once.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    caches: RoutingCaches,
}

impl AppState {
    /// Build state backed by Nominatim and OSRM using `SHAREDWALK_*` variables.
    ///
    /// Builds blocking HTTP clients, so call it outside the async runtime or
    /// from `spawn_blocking`.
    pub fn from_env() -> Result<Self, AppStateError> {
        let config = ProviderConfig::from_env().map_err(AppStateError::Config)?;
        tracing::info!(
            nominatim = %config.nominatim_url,
            osrm = %config.osrm_url,
            timeout_secs = config.timeout.as_secs(),
            "configuring routing providers"
        );
        let caches = default_caches(&config).map_err(AppStateError::Providers)?;
        Ok(Self::from_caches(caches))
    }

    /// Create state around arbitrary providers, e.g. test fakes.
    pub fn from_providers(geocoder: Arc<dyn Geocoder>, router: Arc<dyn WalkingRouter>) -> Self {
        Self::from_caches(RoutingCaches::new(geocoder, router))
    }

    pub fn from_caches(caches: RoutingCaches) -> Self {
        Self {
            inner: Arc::new(AppStateInner { caches }),
        }
    }

    pub fn caches(&self) -> &RoutingCaches {
        &self.inner.caches
    }

    pub fn geocode_stats(&self) -> CacheStats {
        self.inner.caches.geocodes.stats()
    }

    pub fn distance_stats(&self) -> CacheStats {
        self.inner.caches.distances.stats()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("caches", &self.inner.caches)
            .finish()
    }
}
