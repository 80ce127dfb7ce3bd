//! Output formatting for planned shared routes.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;

use sharedwalk_lib::{LocationId, Locations, RouteSummary, WalkerPair};

use crate::terminal::ColorPalette;

/// Output format for the `route` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human readable address lists.
    #[default]
    Text,
    /// The route summary as JSON.
    Json,
}

/// JSON document printed by `route --format json`.
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    #[serde(flatten)]
    pub summary: &'a RouteSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_file: Option<String>,
}

/// Render the summary as pretty-printed JSON.
pub fn render_json(
    summary: &RouteSummary,
    map_file: Option<String>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonOutput { summary, map_file })
}

/// `Total distance: X.X miles`, or a note when there is no walking route.
pub fn format_total_distance(distance: Option<f64>) -> String {
    match distance {
        Some(miles) => format!("Total distance: {miles:.1} miles"),
        None => "Total distance: unreachable".to_string(),
    }
}

fn address_of<'a>(locations: &'a Locations, id: &'a str) -> &'a str {
    locations.get(id).map(String::as_str).unwrap_or(id)
}

fn render_walker(
    out: &mut String,
    heading: &str,
    color: &str,
    palette: &ColorPalette,
    (start, end): (&str, &str),
    path: &[LocationId],
    locations: &Locations,
) {
    let _ = writeln!(
        out,
        "\n{color}{heading}{reset} from {bold}{from}{reset} to {bold}{to}{reset}:",
        reset = palette.reset,
        bold = palette.white_bold,
        from = address_of(locations, start),
        to = address_of(locations, end),
    );
    if path.is_empty() {
        let _ = writeln!(
            out,
            "{}- no walking route found{}",
            palette.gray, palette.reset
        );
    }
    for id in path {
        let _ = writeln!(out, "- {}", address_of(locations, id));
    }
}

/// Render both walkers' paths as address lists followed by walker B's total.
pub fn render_text(
    summary: &RouteSummary,
    walkers: &WalkerPair,
    locations: &Locations,
    palette: &ColorPalette,
) -> String {
    let mut out = String::new();

    for dropped in &summary.dropped {
        let _ = writeln!(
            out,
            "{}Skipped {}: {} ({}){}",
            palette.yellow, dropped.id, dropped.address, dropped.reason, palette.reset
        );
    }

    render_walker(
        &mut out,
        "Walker A's path",
        palette.red,
        palette,
        (walkers.start1.as_str(), walkers.end1.as_str()),
        &summary.path1,
        locations,
    );
    render_walker(
        &mut out,
        "Walker B's path",
        palette.green,
        palette,
        (walkers.start2.as_str(), walkers.end2.as_str()),
        &summary.path2,
        locations,
    );
    let _ = writeln!(out, "{}", format_total_distance(summary.distance2));

    out
}
