use super::geo::LatLng;

/// Planar pixel coordinate in the map surface's projected space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pixel {
    pub x: f64,
    pub y: f64,
}

impl Pixel {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Deterministic lat/lng <-> pixel mapping supplied by the map surface.
///
/// Curve sampling interpolates in pixel space so that sampled points sit
/// exactly on the curve the surface draws; the projector is the contract
/// that keeps both sides in the same coordinate space.
pub trait Projector {
    fn project(&self, point: LatLng) -> Pixel;
    fn unproject(&self, pixel: Pixel) -> LatLng;
}

/// Latitude bound of the square Web Mercator world.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Spherical Web Mercator at a fixed zoom (256 * 2^zoom pixels per world
/// copy). Longitudes below -180 project to negative x; the mapping stays
/// linear so antimeridian-shifted routes remain continuous.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WebMercator {
    scale_px: f64,
}

impl WebMercator {
    pub fn new(zoom: f64) -> Self {
        Self {
            scale_px: 256.0 * zoom.exp2(),
        }
    }

    pub fn scale_px(&self) -> f64 {
        self.scale_px
    }
}

impl Projector for WebMercator {
    fn project(&self, point: LatLng) -> Pixel {
        let lat = point.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
        let phi = lat.to_radians();
        let x = (point.lng + 180.0) / 360.0 * self.scale_px;
        let y = (1.0 - (phi.tan() + 1.0 / phi.cos()).ln() / std::f64::consts::PI) / 2.0
            * self.scale_px;
        Pixel::new(x, y)
    }

    fn unproject(&self, pixel: Pixel) -> LatLng {
        let lng = pixel.x / self.scale_px * 360.0 - 180.0;
        let n = std::f64::consts::PI * (1.0 - 2.0 * pixel.y / self.scale_px);
        let lat = n.sinh().atan().to_degrees();
        LatLng::new(lat, lng)
    }
}
