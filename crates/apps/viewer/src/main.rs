//! Headless host that drives the full route-map pipeline: dataset ->
//! directions -> graph -> selection round trips, against the recording
//! surface. Doubles as a smoke check of the engine without a real map.

use foundation::math::WebMercator;
use formats::formatter::DisplayFormatter;
use formats::settings::RouteMapSettings;
use formats::table::DataTable;
use layers::route_builder::build_data_view;
use layers::surface::RecordingSurface;
use layers::symbology::apply_style_changes;
use scene::graph::RouteMapDataView;
use scene::selection::{
    Click, ClickTarget, SelectionCommand, SelectionMachine, SelectionReply,
};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let table = DataTable::from_json_value(demo_dataset()).expect("demo dataset is well-formed");
    let settings = RouteMapSettings::default();
    let projector = WebMercator::new(3.0);
    let mut surface = RecordingSurface::new();

    let mut view = build_data_view(
        &mut surface,
        &projector,
        &table,
        &settings,
        &DisplayFormatter,
    );
    info!(
        arcs = view.arcs.len(),
        markers = view.markers.len(),
        closed = view.is_closed(),
        "route graph built"
    );
    for (key, marker) in &view.markers {
        info!(
            key = %key,
            shifted = marker.shifted,
            arcs = marker.arcs.len(),
            "marker installed"
        );
    }

    let mut machine = SelectionMachine::new();

    click(
        &mut machine,
        &mut view,
        &mut surface,
        ClickTarget::Arc("LAX-SYD".into()),
        false,
    );
    click(
        &mut machine,
        &mut view,
        &mut surface,
        ClickTarget::Marker("SYD".into()),
        true,
    );
    click(
        &mut machine,
        &mut view,
        &mut surface,
        ClickTarget::Background,
        false,
    );

    info!(
        drawables = surface.drawables.len(),
        fitted = surface.fitted.len(),
        "done"
    );
}

/// One full click round trip: issue the command, acknowledge it the way a
/// selection manager would, apply the resulting restyles.
fn click(
    machine: &mut SelectionMachine,
    view: &mut RouteMapDataView,
    surface: &mut RecordingSurface,
    target: ClickTarget,
    multi_select: bool,
) {
    let Some(command) = machine.on_click(
        view,
        Click {
            target: target.clone(),
            multi_select,
        },
    ) else {
        info!(?target, "click ignored");
        return;
    };
    match &command {
        SelectionCommand::Select { ids, .. } => {
            info!(?target, ids = ids.len(), "selection requested")
        }
        SelectionCommand::Clear { .. } => info!("selection clear requested"),
    }

    let outcome = machine.on_reply(view, SelectionReply::Acknowledged(command.token()));
    apply_style_changes(surface, &outcome.styles);
    info!(
        restyled = outcome.styles.len(),
        selected_arcs = view.arcs.values().filter(|a| a.selected).count(),
        selected_markers = view.markers.values().filter(|m| m.selected).count(),
        "selection applied"
    );
}

fn demo_dataset() -> serde_json::Value {
    json!({
        "categories": [
            { "source": { "display_name": "Market" },
              "values": ["LAX-SYD", "AKL-SYD", "AKL-MEL", "NRT-JFK"] },
            { "source": { "display_name": "Origin" },
              "values": ["LAX", "AKL", "AKL", "NRT"] },
            { "source": { "display_name": "Destination" },
              "values": ["SYD", "SYD", "MEL", "JFK"] }
        ],
        "values": [
            { "source": { "display_name": "From lat" },
              "values": [33.9, -36.8, -36.8, 35.7] },
            { "source": { "display_name": "From lng" },
              "values": [-118.4, 174.8, 174.8, 139.7] },
            { "source": { "display_name": "To lat" },
              "values": [-33.9, -33.9, -37.7, 40.6] },
            { "source": { "display_name": "To lng" },
              "values": [151.2, 151.2, 144.8, -73.8] },
            { "source": { "display_name": "Progress" },
              "values": [0.25, 0.5, 0.75, 0.6] },
            { "source": { "display_name": "Delay (min)", "roles": ["tooltips"], "format": "0.0" },
              "values": [12.5, null, 3.0, 41.0] },
            { "source": { "display_name": "On-time rate", "roles": ["stateValue"] },
              "values": [0.92, 0.71, 0.55, 0.34] },
            { "source": { "display_name": "Band 1 min", "roles": ["stateValueMin1"] },
              "values": [0.9, 0.9, 0.9, 0.9] },
            { "source": { "display_name": "Band 1 max", "roles": ["stateValueMax1"] },
              "values": [1.0, 1.0, 1.0, 1.0] },
            { "source": { "display_name": "Band 2 min", "roles": ["stateValueMin2"] },
              "values": [0.6, 0.6, 0.6, 0.6] },
            { "source": { "display_name": "Band 2 max", "roles": ["stateValueMax2"] },
              "values": [0.9, 0.9, 0.9, 0.9] },
            { "source": { "display_name": "Seats", "roles": ["thicknessValue"] },
              "values": [350.0, 280.0, 180.0, 420.0] },
            { "source": { "display_name": "Seats min", "roles": ["thicknessMin"] },
              "values": [150.0, 150.0, 150.0, 150.0] },
            { "source": { "display_name": "Seats max", "roles": ["thicknessMax"] },
              "values": [450.0, 450.0, 450.0, 450.0] }
        ]
    })
}
