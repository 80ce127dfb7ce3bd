//! Map rendering for planned routes.
//!
//! A [`RouteMap`] holds one marker per graph node and a polyline per walker.
//! It renders to a GeoJSON `FeatureCollection` and to a standalone Leaflet
//! page that embeds that collection.

use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoJsonValue};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::Result;
use crate::geo::Coordinate;
use crate::graph::GraphBuild;
use crate::provider::WalkingRouter;
use crate::shared::SharedPath;
use crate::{LocationId, Locations};

pub const DEFAULT_ZOOM: u8 = 15;
pub const DEFAULT_MAP_FILE: &str = "walking_paths_map.html";

pub const MARKER_COLOR: &str = "blue";
pub const WALKER_A_LABEL: &str = "Walker A's Path";
pub const WALKER_A_COLOR: &str = "red";
pub const WALKER_B_LABEL: &str = "Walker B's Path";
pub const WALKER_B_COLOR: &str = "green";

const LINE_WEIGHT: u8 = 2;
const LEAFLET_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist";
const LINE_OPACITY: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub id: LocationId,
    pub address: String,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapPolyline {
    pub label: &'static str,
    pub color: &'static str,
    pub points: Vec<Coordinate>,
}

/// Markers and walker polylines ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMap {
    pub center: Coordinate,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
    pub polylines: Vec<MapPolyline>,
}

impl RouteMap {
    /// Assemble the map for a planned route.
    ///
    /// Returns `None` when the graph has no nodes to centre on. Polylines are
    /// skipped for single-node paths and when the router has no geometry.
    pub fn build(
        build: &GraphBuild,
        locations: &Locations,
        shared: &SharedPath,
        router: &dyn WalkingRouter,
    ) -> Option<RouteMap> {
        let center = shared
            .path1()
            .first()
            .and_then(|id| build.coordinates.get(id))
            .or_else(|| build.coordinates.values().next())
            .copied()?;

        let markers = build
            .coordinates
            .iter()
            .map(|(id, coordinate)| MapMarker {
                id: id.clone(),
                address: locations.get(id).cloned().unwrap_or_default(),
                coordinate: *coordinate,
            })
            .collect();

        let walkers = [
            (shared.path1(), WALKER_A_LABEL, WALKER_A_COLOR),
            (shared.path2(), WALKER_B_LABEL, WALKER_B_COLOR),
        ];
        let polylines = walkers
            .into_iter()
            .filter_map(|(path, label, color)| {
                walker_line(build, path, router).map(|points| MapPolyline {
                    label,
                    color,
                    points,
                })
            })
            .collect();

        Some(RouteMap {
            center,
            zoom: DEFAULT_ZOOM,
            markers,
            polylines,
        })
    }

    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features: Vec<Feature> = self
            .markers
            .iter()
            .map(|marker| {
                feature(
                    GeoJsonValue::Point(position(marker.coordinate)),
                    json!({
                        "kind": "location",
                        "id": marker.id,
                        "address": marker.address,
                        "color": MARKER_COLOR,
                    }),
                )
            })
            .collect();

        features.extend(self.polylines.iter().map(|line| {
            feature(
                GeoJsonValue::LineString(line.points.iter().copied().map(position).collect()),
                json!({
                    "kind": "path",
                    "label": line.label,
                    "color": line.color,
                    "weight": LINE_WEIGHT,
                    "opacity": LINE_OPACITY,
                }),
            )
        }));

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    /// Render a self-contained Leaflet page.
    pub fn to_html(&self) -> String {
        // Markup characters only occur inside JSON strings, where the
        // unicode escapes are equivalent and cannot close the script tag.
        let data = escape_script_json(&self.to_geojson().to_string());
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Walking paths</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="{LEAFLET_URL}/leaflet.css">
<script src="{LEAFLET_URL}/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map").setView([{lat}, {lon}], {zoom});
L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  maxZoom: 19,
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
L.geoJSON({data}, {{
  style: function (feature) {{
    var p = feature.properties;
    return {{ color: p.color, weight: p.weight, opacity: p.opacity }};
  }},
  onEachFeature: function (feature, layer) {{
    var p = feature.properties;
    var popup = document.createElement("div");
    popup.textContent = p.kind === "path" ? p.label : p.address;
    layer.bindPopup(popup);
  }}
}}).addTo(map);
</script>
</body>
</html>
"#,
            lat = self.center.lat,
            lon = self.center.lon,
            zoom = self.zoom,
            data = data,
        )
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_html())?;
        debug!(path = %path.display(), "route map saved");
        Ok(())
    }
}

fn walker_line(
    build: &GraphBuild,
    path: &[LocationId],
    router: &dyn WalkingRouter,
) -> Option<Vec<Coordinate>> {
    if path.len() < 2 {
        return None;
    }
    let waypoints: Vec<Coordinate> = path
        .iter()
        .map(|id| build.coordinates.get(id).copied())
        .collect::<Option<_>>()?;

    match router.route_geometry(&waypoints) {
        Ok(points) => points,
        Err(err) => {
            warn!(error = %err, "route geometry lookup failed");
            None
        }
    }
}

fn escape_script_json(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn position(coordinate: Coordinate) -> Vec<f64> {
    vec![coordinate.lon, coordinate.lat]
}

fn feature(value: GeoJsonValue, properties: serde_json::Value) -> Feature {
    let properties: Option<JsonObject> = match properties {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    };
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RoutingCaches;
    use crate::graph::{build_graph, GraphBuildOptions};
    use crate::shared::{find_shared_path, WalkerPair};
    use crate::test_helpers::{davis_fixture, FakeRouter};
    use std::sync::Arc;

    fn planned(walkers: WalkerPair) -> (GraphBuild, Locations, SharedPath) {
        let (locations, geocoder, router) = davis_fixture();
        let caches = RoutingCaches::new(Arc::new(geocoder), Arc::new(router));
        let build = build_graph(&locations, &caches, &GraphBuildOptions::default());
        let shared = find_shared_path(&build.graph, &walkers).unwrap();
        (build, locations, shared)
    }

    #[test]
    fn markers_for_every_node_and_both_walkers() {
        let (build, locations, shared) = planned(WalkerPair::new("A", "E", "B", "E"));
        let router = FakeRouter::new();

        let map = RouteMap::build(&build, &locations, &shared, &router).unwrap();

        assert_eq!(map.center, build.coordinates["A"]);
        assert_eq!(map.zoom, DEFAULT_ZOOM);
        assert_eq!(map.markers.len(), 4);
        assert!(map.markers.iter().all(|m| m.id != "C"));
        let labels: Vec<&str> = map.polylines.iter().map(|l| l.label).collect();
        assert_eq!(labels, vec![WALKER_A_LABEL, WALKER_B_LABEL]);
        assert_eq!(router.geometry_calls(), 2);
    }

    #[test]
    fn single_node_paths_are_not_drawn() {
        let (build, locations, shared) = planned(WalkerPair::new("A", "A", "B", "D"));
        let router = FakeRouter::new();

        let map = RouteMap::build(&build, &locations, &shared, &router).unwrap();

        assert_eq!(map.polylines.len(), 1);
        assert_eq!(map.polylines[0].color, WALKER_B_COLOR);
    }

    #[test]
    fn missing_geometry_leaves_markers_only() {
        let (build, locations, shared) = planned(WalkerPair::new("A", "E", "B", "E"));
        let router = FakeRouter::new().without_geometry();

        let map = RouteMap::build(&build, &locations, &shared, &router).unwrap();

        assert!(map.polylines.is_empty());
        assert_eq!(map.markers.len(), 4);
    }

    #[test]
    fn geojson_uses_lon_lat_order() {
        let (build, locations, shared) = planned(WalkerPair::new("A", "B", "A", "B"));
        let map = RouteMap::build(&build, &locations, &shared, &FakeRouter::new()).unwrap();

        let value = serde_json::to_value(map.to_geojson()).unwrap();
        let first = &value["features"][0];
        let a = build.coordinates["A"];

        assert_eq!(first["geometry"]["type"], "Point");
        assert_eq!(first["geometry"]["coordinates"][0], a.lon);
        assert_eq!(first["geometry"]["coordinates"][1], a.lat);
        assert_eq!(first["properties"]["address"], locations["A"]);
    }

    #[test]
    fn html_embeds_labels_and_saves() {
        let (build, locations, shared) = planned(WalkerPair::new("A", "E", "B", "E"));
        let map = RouteMap::build(&build, &locations, &shared, &FakeRouter::new()).unwrap();

        let html = map.to_html();
        assert!(html.contains("leaflet"));
        assert!(html.contains("Walker A's Path"));
        assert!(html.contains("Walker B's Path"));

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(DEFAULT_MAP_FILE);
        map.save(&file).unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), html);
    }

    #[test]
    fn html_never_embeds_address_markup() {
        let (build, mut locations, shared) = planned(WalkerPair::new("A", "E", "B", "E"));
        locations.insert("A".to_string(), "<img src=x onerror=alert(1)></script>".to_string());
        let map = RouteMap::build(&build, &locations, &shared, &FakeRouter::new()).unwrap();

        let html = map.to_html();

        assert!(!html.contains("<img"));
        assert!(!html.contains("alert(1)></script>"));
        assert!(html.contains("\\u003cimg src=x onerror=alert(1)\\u003e"));
        assert!(html.contains("popup.textContent"));
        assert!(!html.contains("bindPopup(p.address"));
        // The GeoJSON itself keeps the caller's text.
        let value = serde_json::to_value(map.to_geojson()).unwrap();
        assert_eq!(value["features"][0]["properties"]["address"], locations["A"]);
    }

    #[test]
    fn empty_graph_has_no_map() {
        let build = GraphBuild::default();
        let shared = SharedPath {
            first: crate::path::PathOutcome::Unreachable,
            second: crate::path::PathOutcome::Unreachable,
        };
        let map = RouteMap::build(&build, &Locations::new(), &shared, &FakeRouter::new());
        assert!(map.is_none());
    }
}
