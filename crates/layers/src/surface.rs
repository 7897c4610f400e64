//! Map-surface seam.
//!
//! The engine draws by issuing drawable and style operations against this
//! trait; tile rendering, DOM/SVG icon rendering and the tooltip widget
//! all live on the host side of it. Viewport operations (`fit_bounds`) are
//! synchronous and never touch selection state.

use std::collections::BTreeMap;

use foundation::math::LatLng;
use scene::graph::{DrawableId, RenderLayerId, TooltipItem};

/// Stroke style for a curve drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
}

/// Fill style for a point drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct PointStyle {
    pub color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub radius: f64,
}

pub trait MapSurface {
    fn add_layer(&mut self) -> RenderLayerId;

    /// Removes every drawable previously added to `layer`.
    fn clear_layer(&mut self, layer: RenderLayerId);

    /// Adds a curved path through the control point, drawn in the
    /// surface's own pixel space.
    fn add_curve(
        &mut self,
        layer: RenderLayerId,
        from: LatLng,
        control: LatLng,
        to: LatLng,
        style: PathStyle,
    ) -> DrawableId;

    fn add_point(&mut self, layer: RenderLayerId, at: LatLng, style: PointStyle) -> DrawableId;

    /// Adds an icon drawable from inline vector markup; rotation and fill
    /// are already baked into the markup.
    fn add_icon(&mut self, layer: RenderLayerId, at: LatLng, markup: String) -> DrawableId;

    fn set_opacity(&mut self, drawable: DrawableId, opacity: f64, fill_opacity: f64);

    fn bind_tooltip(&mut self, drawable: DrawableId, items: &[TooltipItem]);

    fn fit_bounds(&mut self, points: &[LatLng]);
}

/// Everything known about one drawable on the recording surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDrawable {
    pub layer: RenderLayerId,
    pub shape: RecordedShape,
    pub opacity: f64,
    pub fill_opacity: f64,
    pub tooltip: Vec<TooltipItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedShape {
    Curve {
        from: LatLng,
        control: LatLng,
        to: LatLng,
        style: PathStyle,
    },
    Point {
        at: LatLng,
        style: PointStyle,
    },
    Icon {
        at: LatLng,
        markup: String,
    },
}

/// In-memory surface for tests and headless hosts. Records every drawable
/// and style update instead of rendering.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_layer: u64,
    next_drawable: u64,
    pub drawables: BTreeMap<DrawableId, RecordedDrawable>,
    pub fitted: Vec<Vec<LatLng>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drawable(&self, id: DrawableId) -> Option<&RecordedDrawable> {
        self.drawables.get(&id)
    }

    pub fn layer_len(&self, layer: RenderLayerId) -> usize {
        self.drawables.values().filter(|d| d.layer == layer).count()
    }

    fn push(&mut self, layer: RenderLayerId, shape: RecordedShape, opacity: f64, fill_opacity: f64) -> DrawableId {
        let id = DrawableId(self.next_drawable);
        self.next_drawable += 1;
        self.drawables.insert(
            id,
            RecordedDrawable {
                layer,
                shape,
                opacity,
                fill_opacity,
                tooltip: Vec::new(),
            },
        );
        id
    }
}

impl MapSurface for RecordingSurface {
    fn add_layer(&mut self) -> RenderLayerId {
        let id = RenderLayerId(self.next_layer);
        self.next_layer += 1;
        id
    }

    fn clear_layer(&mut self, layer: RenderLayerId) {
        self.drawables.retain(|_, d| d.layer != layer);
    }

    fn add_curve(
        &mut self,
        layer: RenderLayerId,
        from: LatLng,
        control: LatLng,
        to: LatLng,
        style: PathStyle,
    ) -> DrawableId {
        let opacity = style.opacity;
        self.push(
            layer,
            RecordedShape::Curve {
                from,
                control,
                to,
                style,
            },
            opacity,
            opacity,
        )
    }

    fn add_point(&mut self, layer: RenderLayerId, at: LatLng, style: PointStyle) -> DrawableId {
        let fill_opacity = style.fill_opacity;
        self.push(layer, RecordedShape::Point { at, style }, 1.0, fill_opacity)
    }

    fn add_icon(&mut self, layer: RenderLayerId, at: LatLng, markup: String) -> DrawableId {
        self.push(layer, RecordedShape::Icon { at, markup }, 1.0, 1.0)
    }

    fn set_opacity(&mut self, drawable: DrawableId, opacity: f64, fill_opacity: f64) {
        if let Some(d) = self.drawables.get_mut(&drawable) {
            d.opacity = opacity;
            d.fill_opacity = fill_opacity;
        }
    }

    fn bind_tooltip(&mut self, drawable: DrawableId, items: &[TooltipItem]) {
        if let Some(d) = self.drawables.get_mut(&drawable) {
            d.tooltip = items.to_vec();
        }
    }

    fn fit_bounds(&mut self, points: &[LatLng]) {
        self.fitted.push(points.to_vec());
    }
}
