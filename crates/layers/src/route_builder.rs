//! Builds the rendered route graph from a host dataset.
//!
//! Every dataset update is a full rebuild: the previous snapshot's layers
//! are cleared by the host, the direction pipeline reruns here, and a
//! fresh snapshot replaces the old one wholesale. There is no incremental
//! diffing.

use std::collections::BTreeMap;

use foundation::math::{LatLng, Projector, ThicknessOptions, curve};
use formats::formatter::ValueFormatter;
use formats::ingest::{Direction, parse_directions};
use formats::settings::RouteMapSettings;
use formats::table::DataTable;
use scene::graph::{
    GraphKey, RenderLayerId, RouteMapArc, RouteMapDataView, RouteMapMarker, SelectionId,
    shifted_marker_key,
};

use crate::icon;
use crate::surface::{MapSurface, PathStyle, PointStyle};
use crate::symbology;

/// Rebuilds the snapshot for a dataset update.
///
/// Arcs are keyed by market; a repeated market key overwrites the earlier
/// arc (last write wins). Markers are deduplicated per location code, with
/// shifted and unshifted endpoints kept in separate tables during the pass
/// and merged into the snapshot afterwards: unshifted instances install
/// under their plain code, shifted instances under `code + "_360"`.
pub fn build_data_view<S, P, F>(
    surface: &mut S,
    projector: &P,
    table: &DataTable,
    settings: &RouteMapSettings,
    formatter: &F,
) -> RouteMapDataView
where
    S: MapSurface,
    P: Projector,
    F: ValueFormatter,
{
    let settings = settings.clone().sanitized();
    let arcs_layer = surface.add_layer();
    let markers_layer = surface.add_layer();
    let mut view = RouteMapDataView::new(arcs_layer, markers_layer);

    let mut plain: BTreeMap<String, RouteMapMarker> = BTreeMap::new();
    let mut shifted: BTreeMap<String, RouteMapMarker> = BTreeMap::new();

    for direction in parse_directions(table, formatter) {
        let mut arc = build_arc(surface, projector, &direction, &settings, arcs_layer);

        let endpoints = [
            (
                direction.from_code.as_str(),
                direction.latlng.from,
                direction.latlng.from_shifted,
            ),
            (
                direction.to_code.as_str(),
                direction.latlng.to,
                direction.latlng.to_shifted,
            ),
        ];
        for (code, position, is_shifted) in endpoints {
            let instances = if is_shifted { &mut shifted } else { &mut plain };
            let marker = instances.entry(code.to_string()).or_insert_with(|| {
                let point = surface.add_point(
                    markers_layer,
                    position,
                    PointStyle {
                        color: settings.markers.marker_color.clone(),
                        fill_color: settings.markers.marker_color.clone(),
                        fill_opacity: 1.0,
                        radius: settings.markers.radius,
                    },
                );
                RouteMapMarker {
                    code: code.to_string(),
                    shifted: is_shifted,
                    position,
                    point,
                    arcs: Vec::new(),
                    selected: false,
                }
            });
            if !marker.arcs.iter().any(|k| k == &direction.market) {
                marker.arcs.push(direction.market.clone());
            }
            let marker_key = if is_shifted {
                shifted_marker_key(code)
            } else {
                code.to_string()
            };
            arc.markers.push(marker_key);
        }

        view.register_hit(arc.curve, GraphKey::Arc(direction.market.clone()));
        view.register_hit(arc.icon, GraphKey::Arc(direction.market.clone()));
        view.arcs.insert(direction.market.clone(), arc);
    }

    for (code, marker) in plain {
        view.register_hit(marker.point, GraphKey::Marker(code.clone()));
        view.markers.insert(code, marker);
    }
    for (code, marker) in shifted {
        let key = shifted_marker_key(&code);
        view.register_hit(marker.point, GraphKey::Marker(key.clone()));
        view.markers.insert(key, marker);
    }

    let focus: Vec<LatLng> = view.markers.values().map(|m| m.position).collect();
    if !focus.is_empty() {
        surface.fit_bounds(&focus);
    }
    view
}

fn build_arc<S, P>(
    surface: &mut S,
    projector: &P,
    direction: &Direction,
    settings: &RouteMapSettings,
    arcs_layer: RenderLayerId,
) -> RouteMapArc
where
    S: MapSurface,
    P: Projector,
{
    let from = direction.latlng.from;
    let to = direction.latlng.to;
    let mid = curve::midpoint(from, to);
    let control = curve::control_point(from, to, mid);

    let curve_id = surface.add_curve(
        arcs_layer,
        from,
        control,
        to,
        PathStyle {
            color: settings.routes.route_color.clone(),
            weight: arc_weight(direction, settings),
            opacity: 1.0,
        },
    );
    surface.bind_tooltip(curve_id, &direction.tooltip);

    let at = curve::sample_quadratic(projector, from, to, control, direction.progress);
    let rotation = curve::heading_at(projector, from, to, control, direction.progress);
    let markup = icon::direction_icon(rotation, symbology::state_color(direction, settings));
    let icon_id = surface.add_icon(arcs_layer, at, markup);

    RouteMapArc {
        market: direction.market.clone(),
        curve: curve_id,
        icon: icon_id,
        markers: Vec::with_capacity(2),
        tooltip: direction.tooltip.clone(),
        selected: false,
        selection_id: SelectionId(direction.index as u32),
    }
}

/// Line weight: interpolated when the thickness bounds are usable and the
/// value is in range, the configured default otherwise.
fn arc_weight(direction: &Direction, settings: &RouteMapSettings) -> f64 {
    let routes = &settings.routes;
    let (Some(min), Some(max), Some(value)) = (
        direction.thickness_min,
        direction.thickness_max,
        direction.thickness_value,
    ) else {
        return routes.default_thickness;
    };
    let Some(options) = ThicknessOptions::new(
        Some(min),
        Some(max),
        Some(routes.min_thickness),
        Some(routes.max_thickness),
    ) else {
        return routes.default_thickness;
    };
    if value < min || value > max {
        return routes.default_thickness;
    }
    options.thickness_for(value, routes.min_thickness)
}
