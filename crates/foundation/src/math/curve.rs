use super::geo::{LatLng, planar_distance_rad};
use super::mercator::{Pixel, Projector};

/// Separation (planar, radian-scaled) above which the bow radius is halved,
/// flattening long routes.
const FLAT_BOW_SEPARATION: f64 = 0.6;

/// Below this delta a segment counts as degenerate along that axis.
const SLOPE_EPS: f64 = 1e-12;

/// Planar midpoint of the two endpoints. Not a spherical midpoint.
pub fn midpoint(from: LatLng, to: LatLng) -> LatLng {
    LatLng::new((from.lat + to.lat) / 2.0, (from.lng + to.lng) / 2.0)
}

/// Control point for the route bow.
///
/// Works entirely in planar (lat, lng) space: the point lies on the
/// perpendicular bisector of `from`-`to`, at a radius derived from
/// `|to - mid|` (halved for long routes). Substituting the bisector line
/// into the circle centered at `mid` yields a quadratic in the latitude
/// coordinate; the second algebraic root is taken when both endpoint
/// latitudes are positive, the first otherwise. The root choice fixes the
/// bow direction and northern/southern hemisphere routes bow oppositely.
pub fn control_point(from: LatLng, to: LatLng, mid: LatLng) -> LatLng {
    let mut radius = {
        let dlat = to.lat - mid.lat;
        let dlng = to.lng - mid.lng;
        (dlat * dlat + dlng * dlng).sqrt()
    };
    if planar_distance_rad(from, to) > FLAT_BOW_SEPARATION {
        radius /= 2.0;
    }

    let northern = from.lat > 0.0 && to.lat > 0.0;
    let dlat = to.lat - from.lat;
    let dlng = to.lng - from.lng;

    if dlng.abs() < SLOPE_EPS && dlat.abs() < SLOPE_EPS {
        return mid;
    }
    if dlng.abs() < SLOPE_EPS {
        // Meridional segment: the bisector is the horizontal line through
        // mid and the circle meets it at mid.lng +- radius.
        let lng = if northern { mid.lng - radius } else { mid.lng + radius };
        return LatLng::new(mid.lat, lng);
    }
    if dlat.abs() < SLOPE_EPS {
        // Zonal segment: the bisector is vertical, roots are mid.lat +- radius.
        let lat = if northern { mid.lat - radius } else { mid.lat + radius };
        return LatLng::new(lat, mid.lng);
    }

    let slope = dlat / dlng;
    let perpendicular = -1.0 / slope;

    // (lat - mid.lat)^2 * (1 + 1/p^2) = r^2, expanded to a*lat^2 + b*lat + c.
    let k = 1.0 + 1.0 / (perpendicular * perpendicular);
    let a = k;
    let b = -2.0 * k * mid.lat;
    let c = k * mid.lat * mid.lat - radius * radius;
    let discriminant = (b * b - 4.0 * a * c).max(0.0);

    let first_root = (-b + discriminant.sqrt()) / (2.0 * a);
    let second_root = (-b - discriminant.sqrt()) / (2.0 * a);

    let lat = if northern { second_root } else { first_root };
    let lng = mid.lng + (lat - mid.lat) / perpendicular;
    LatLng::new(lat, lng)
}

/// Quadratic Bezier sample between the projected endpoints.
///
/// Both endpoints and the control point are projected to pixel space, the
/// interpolation runs there, and the result is unprojected. The surface's
/// own curve primitive draws in pixel space, so sampling anywhere else
/// would put the direction icon off the drawn curve.
pub fn sample_quadratic<P: Projector>(
    projector: &P,
    from: LatLng,
    to: LatLng,
    control: LatLng,
    t: f64,
) -> LatLng {
    let p0 = projector.project(from);
    let p1 = projector.project(control);
    let p2 = projector.project(to);
    let u = 1.0 - t;
    let x = u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x;
    let y = u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y;
    projector.unproject(Pixel::new(x, y))
}

/// Forward azimuth from `from` to `to` in degrees, normalized to [0, 360).
pub fn heading(from: LatLng, to: LatLng) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let dlng = (to.lng - from.lng).to_radians();
    let y = dlng.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlng.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Instantaneous travel direction at the animation progress point, taken
/// between curve samples just behind and just ahead of `progress`.
pub fn heading_at<P: Projector>(
    projector: &P,
    from: LatLng,
    to: LatLng,
    control: LatLng,
    progress: f64,
) -> f64 {
    let behind = sample_quadratic(projector, from, to, control, progress - 0.01);
    let ahead = sample_quadratic(projector, from, to, control, progress + 0.01);
    heading(behind, ahead)
}
