// One module per subcommand; main.rs only parses and dispatches.

pub mod interactive;
pub mod route;

use anyhow::{Context, Result};

use sharedwalk_lib::{default_caches, ProviderConfig, RoutingCaches};

/// Build HTTP-backed caches from `SHAREDWALK_*` environment settings.
pub(crate) fn caches_from_env() -> Result<RoutingCaches> {
    let config = ProviderConfig::from_env().context("invalid provider configuration")?;
    default_caches(&config).context("failed to build geocoding and routing clients")
}
