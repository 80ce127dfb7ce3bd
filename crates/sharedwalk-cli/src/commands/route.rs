//! Route command handler for planning two walkers over supplied addresses.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::warn;

use sharedwalk_cli::locations::collect_locations;
use sharedwalk_cli::output::{render_json, render_text, OutputFormat};
use sharedwalk_cli::terminal::ColorPalette;
use sharedwalk_lib::{
    plan_shared_route, Locations, RouteMap, RoutingCaches, SharedRoutePlan, SharedRouteRequest,
    WalkerPair,
};

use crate::commands::caches_from_env;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Parsed `ID=ADDRESS` pairs in command-line order.
    pub locations: Vec<(String, String)>,
    pub walkers: WalkerPair,
    /// Where to write the map, or `None` to skip it.
    pub map: Option<PathBuf>,
    pub format: OutputFormat,
}

impl RouteCommandArgs {
    /// Validate the arguments into a library request without any network access.
    pub fn to_request(&self) -> Result<SharedRouteRequest> {
        let locations = collect_locations(self.locations.clone())?;
        let request = SharedRouteRequest::new(locations, self.walkers.clone());

        let unknown = request.unknown_ids();
        if !unknown.is_empty() {
            let known: Vec<&str> = request.locations.keys().map(String::as_str).collect();
            bail!(
                "unknown location identifier(s): {} (known: {})",
                unknown.join(", "),
                known.join(", ")
            );
        }

        Ok(request)
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(args: &RouteCommandArgs) -> Result<()> {
    let request = args.to_request()?;
    let caches = caches_from_env()?;

    let plan = plan_shared_route(&caches, &request).context("failed to plan shared route")?;

    let map_file = match &args.map {
        Some(path) => save_map(&caches, &request.locations, &plan, path)?,
        None => None,
    };

    match args.format {
        OutputFormat::Text => {
            print!(
                "{}",
                render_text(
                    &plan.summary(),
                    &request.walkers,
                    &request.locations,
                    &ColorPalette::detect()
                )
            );
            if let Some(path) = &map_file {
                println!("\nMap saved as '{}'", path.display());
            }
        }
        OutputFormat::Json => {
            let map_file = map_file.map(|path| path.display().to_string());
            let json = render_json(&plan.summary(), map_file)
                .context("failed to serialize route summary")?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Render the route map to `path`.
///
/// Returns `None` when there was nothing to draw.
pub(crate) fn save_map(
    caches: &RoutingCaches,
    locations: &Locations,
    plan: &SharedRoutePlan,
    path: &Path,
) -> Result<Option<PathBuf>> {
    let router = caches.distances.router();
    let Some(map) = RouteMap::build(&plan.build, locations, &plan.shared, router) else {
        warn!("no locations could be placed on the map, skipping it");
        return Ok(None);
    };

    map.save(path)
        .with_context(|| format!("failed to write map to {}", path.display()))?;
    Ok(Some(path.to_path_buf()))
}
