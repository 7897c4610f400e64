/// Scale applied to planar coordinate distances (degrees to radians).
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Geographic coordinate in degrees.
///
/// Longitudes are allowed outside [-180, 180]: antimeridian resolution
/// shifts a longitude by -360 so a route can render without wrapping
/// across the map edge.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Planar (lat, lng) distance scaled to radians.
///
/// Deliberately not a great-circle distance: route-bow construction and
/// antimeridian candidate ranking both operate in this planar space.
pub fn planar_distance_rad(a: LatLng, b: LatLng) -> f64 {
    let dlat = a.lat - b.lat;
    let dlng = a.lng - b.lng;
    (dlat * dlat + dlng * dlng).sqrt() * DEG_TO_RAD
}
