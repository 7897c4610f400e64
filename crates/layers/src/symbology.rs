//! Style policy: selection opacity and state-band coloring.

use formats::ingest::Direction;
use formats::settings::RouteMapSettings;
use scene::selection::StyleChange;

use crate::surface::MapSurface;

/// Opacity applied to a drawable by selection state.
pub fn selection_opacity(selected: bool) -> f64 {
    if selected { 1.0 } else { 0.3 }
}

/// Resolves the direction icon's fill color from the state bands.
///
/// A band applies when `min <= value <= max` and `min != -max`; a missing
/// bound substitutes the widest possible one, which also makes a fully
/// unbound band skip itself through the `min != -max` check. Bands are
/// tested in order and the first match wins.
pub fn state_color<'a>(direction: &Direction, settings: &'a RouteMapSettings) -> &'a str {
    let Some(value) = direction.state_value else {
        return &settings.routes.icon_color;
    };

    let band_colors = [
        settings.state1.state_color.as_str(),
        settings.state2.state_color.as_str(),
        settings.state3.state_color.as_str(),
    ];
    for (band, color) in direction.state_bands.iter().zip(band_colors) {
        let min = band.min.unwrap_or(-f64::MAX);
        let max = band.max.unwrap_or(f64::MAX);
        if value >= min && value <= max && min != -max {
            return color;
        }
    }
    &settings.routes.icon_color
}

/// Applies selection restyles produced by the state machine.
pub fn apply_style_changes<S: MapSurface>(surface: &mut S, changes: &[StyleChange]) {
    for change in changes {
        let opacity = selection_opacity(change.selected);
        surface.set_opacity(change.drawable, opacity, opacity);
    }
}
