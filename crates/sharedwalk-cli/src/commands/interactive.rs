//! Interactive command: prompt for addresses and walkers, then plan.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use sharedwalk_cli::output::render_text;
use sharedwalk_cli::prompt::{read_addresses, read_walkers, write_locations};
use sharedwalk_cli::terminal::ColorPalette;
use sharedwalk_lib::{plan_shared_route, SharedRouteRequest};

use crate::commands::caches_from_env;
use crate::commands::route::save_map;

/// Handle the interactive subcommand, writing the map to `map_path`.
pub fn handle_interactive_command(map_path: &Path) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    let locations = read_addresses(&mut input, &mut out)?;
    write_locations(&mut out, &locations)?;
    let walkers = read_walkers(&mut input, &mut out, &locations)?;

    let caches = caches_from_env()?;
    writeln!(out, "\nCalculating walking distances... (this may take a moment)")?;
    out.flush()?;

    let request = SharedRouteRequest::new(locations, walkers);
    let plan = plan_shared_route(&caches, &request).context("failed to plan shared route")?;

    write!(
        out,
        "{}",
        render_text(
            &plan.summary(),
            &request.walkers,
            &request.locations,
            &ColorPalette::detect()
        )
    )?;

    if let Some(path) = save_map(&caches, &request.locations, &plan, map_path)? {
        writeln!(out, "\nMap saved as '{}'", path.display())?;
    }

    Ok(())
}
