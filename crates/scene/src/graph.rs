use std::collections::BTreeMap;

use foundation::math::LatLng;

/// External selection identity for one route, bound to its dataset row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionId(pub u32);

/// Opaque handle to a drawable created on the map surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrawableId(pub u64);

/// Opaque handle to a render layer on the map surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderLayerId(pub u64);

/// One formatted tooltip row bound to an arc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipItem {
    pub label: String,
    pub value: String,
}

/// Suffix for the shifted instance of a location code when both the
/// shifted and unshifted rendering are needed simultaneously.
pub const SHIFTED_MARKER_SUFFIX: &str = "_360";

/// Marker-map key for a shifted instance of `code`.
pub fn shifted_marker_key(code: &str) -> String {
    format!("{code}{SHIFTED_MARKER_SUFFIX}")
}

/// Rendered curve for one route between two location codes.
///
/// Arc <-> marker edges are stored as keys on both sides; neither side
/// owns the other and traversal is O(log n) map lookups either way.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMapArc {
    pub market: String,
    pub curve: DrawableId,
    pub icon: DrawableId,
    /// Exactly two entries after a build: the from- and to-marker keys.
    pub markers: Vec<String>,
    pub tooltip: Vec<TooltipItem>,
    pub selected: bool,
    pub selection_id: SelectionId,
}

/// Rendered point for one location code, possibly a shifted `_360` instance.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMapMarker {
    pub code: String,
    pub shifted: bool,
    pub position: LatLng,
    pub point: DrawableId,
    /// Keys of every arc touching this instance.
    pub arcs: Vec<String>,
    pub selected: bool,
}

/// What a drawable resolves to when the surface reports a click on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphKey {
    Arc(String),
    Marker(String),
}

/// The rendered snapshot: a closed arc/marker graph plus its two render
/// layers. Replaced wholesale on every dataset update; the previous
/// snapshot's layers are cleared before the new one is installed.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMapDataView {
    pub arcs: BTreeMap<String, RouteMapArc>,
    pub markers: BTreeMap<String, RouteMapMarker>,
    pub arcs_layer: RenderLayerId,
    pub markers_layer: RenderLayerId,
    hit_table: BTreeMap<DrawableId, GraphKey>,
}

impl RouteMapDataView {
    pub fn new(arcs_layer: RenderLayerId, markers_layer: RenderLayerId) -> Self {
        Self {
            arcs: BTreeMap::new(),
            markers: BTreeMap::new(),
            arcs_layer,
            markers_layer,
            hit_table: BTreeMap::new(),
        }
    }

    /// Registers the entity a drawable resolves to on click.
    pub fn register_hit(&mut self, drawable: DrawableId, key: GraphKey) {
        self.hit_table.insert(drawable, key);
    }

    /// Resolves a surface click on a drawable to a graph entity.
    pub fn hit(&self, drawable: DrawableId) -> Option<&GraphKey> {
        self.hit_table.get(&drawable)
    }

    pub fn has_selection(&self) -> bool {
        self.arcs.values().any(|arc| arc.selected)
            || self.markers.values().any(|marker| marker.selected)
    }

    /// Graph closure: every arc endpoint key resolves to a marker in this
    /// snapshot and every marker arc key resolves to an arc in it.
    pub fn is_closed(&self) -> bool {
        self.arcs
            .values()
            .all(|arc| arc.markers.iter().all(|key| self.markers.contains_key(key)))
            && self
                .markers
                .values()
                .all(|marker| marker.arcs.iter().all(|key| self.arcs.contains_key(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DrawableId, GraphKey, RenderLayerId, RouteMapArc, RouteMapDataView, RouteMapMarker,
        SelectionId, shifted_marker_key,
    };
    use foundation::math::LatLng;

    fn empty_view() -> RouteMapDataView {
        RouteMapDataView::new(RenderLayerId(0), RenderLayerId(1))
    }

    #[test]
    fn shifted_key_appends_suffix() {
        assert_eq!(shifted_marker_key("JFK"), "JFK_360");
    }

    #[test]
    fn closure_detects_dangling_references() {
        let mut view = empty_view();
        view.arcs.insert(
            "LAX-SYD".into(),
            RouteMapArc {
                market: "LAX-SYD".into(),
                curve: DrawableId(1),
                icon: DrawableId(2),
                markers: vec!["LAX".into(), "SYD".into()],
                tooltip: Vec::new(),
                selected: false,
                selection_id: SelectionId(0),
            },
        );
        assert!(!view.is_closed(), "markers are missing");

        for code in ["LAX", "SYD"] {
            view.markers.insert(
                code.into(),
                RouteMapMarker {
                    code: code.into(),
                    shifted: false,
                    position: LatLng::new(0.0, 0.0),
                    point: DrawableId(3),
                    arcs: vec!["LAX-SYD".into()],
                    selected: false,
                },
            );
        }
        assert!(view.is_closed());

        view.arcs.clear();
        assert!(!view.is_closed(), "marker arc lists now dangle");
    }

    #[test]
    fn hit_table_resolves_drawables() {
        let mut view = empty_view();
        view.register_hit(DrawableId(7), GraphKey::Marker("LAX".into()));
        assert_eq!(view.hit(DrawableId(7)), Some(&GraphKey::Marker("LAX".into())));
        assert_eq!(view.hit(DrawableId(8)), None);
    }
}
