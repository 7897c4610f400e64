use super::geo::{LatLng, planar_distance_rad};

/// Resolved route endpoints plus the longitude-shift flags recording which
/// endpoint was moved by -360 degrees.
///
/// The flags are part of the route's identity downstream: a location code
/// rendered at its shifted position is a distinct marker instance from the
/// same code rendered unshifted.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FromToLatLng {
    pub from: LatLng,
    pub to: LatLng,
    pub from_shifted: bool,
    pub to_shifted: bool,
}

/// Picks the endpoint representation with the smallest apparent path length.
///
/// Ordering contract:
/// - Candidates are tried in a fixed order: as given, `from` shifted by
///   -360, `to` shifted, both shifted.
/// - Comparison is strict `<`, so on ties the earlier candidate wins and
///   the as-given pair is the baseline.
/// - The both-shifted candidate is rejected outright when it would place
///   both endpoints below -180 longitude, even if nominally shortest;
///   such a route would render off the usable map extent.
///
/// Returns `None` when any input coordinate is missing.
pub fn resolve(
    from_lat: Option<f64>,
    from_lng: Option<f64>,
    to_lat: Option<f64>,
    to_lng: Option<f64>,
) -> Option<FromToLatLng> {
    let from = LatLng::new(from_lat?, from_lng?);
    let to = LatLng::new(to_lat?, to_lng?);

    const SHIFTS: [(bool, bool); 4] = [(false, false), (true, false), (false, true), (true, true)];

    let mut best: Option<(f64, FromToLatLng)> = None;
    for (from_shifted, to_shifted) in SHIFTS {
        let candidate = FromToLatLng {
            from: shifted(from, from_shifted),
            to: shifted(to, to_shifted),
            from_shifted,
            to_shifted,
        };
        if from_shifted && to_shifted && candidate.from.lng < -180.0 && candidate.to.lng < -180.0 {
            continue;
        }
        let dist = planar_distance_rad(candidate.from, candidate.to);
        best = match best {
            None => Some((dist, candidate)),
            Some((best_dist, _)) if dist < best_dist => Some((dist, candidate)),
            keep => keep,
        };
    }

    best.map(|(_, candidate)| candidate)
}

fn shifted(point: LatLng, shift: bool) -> LatLng {
    if shift {
        LatLng::new(point.lat, point.lng - 360.0)
    } else {
        point
    }
}

#[cfg(test)]
mod tests {
    use super::{FromToLatLng, resolve};
    use crate::math::geo::planar_distance_rad;

    fn resolve_deg(from_lat: f64, from_lng: f64, to_lat: f64, to_lng: f64) -> FromToLatLng {
        resolve(Some(from_lat), Some(from_lng), Some(to_lat), Some(to_lng)).expect("route")
    }

    #[test]
    fn missing_coordinate_yields_no_route() {
        assert!(resolve(None, Some(1.0), Some(2.0), Some(3.0)).is_none());
        assert!(resolve(Some(1.0), Some(1.0), Some(2.0), None).is_none());
    }

    #[test]
    fn short_route_stays_unshifted() {
        let r = resolve_deg(48.4, -89.3, 43.7, -79.6);
        assert!(!r.from_shifted);
        assert!(!r.to_shifted);
        assert_eq!(r.from.lng, -89.3);
    }

    #[test]
    fn eastbound_pacific_route_shifts_destination() {
        // Los Angeles to Sydney: shifting the destination by -360 avoids a
        // route spanning nearly the whole map.
        let r = resolve_deg(33.9, -118.4, -33.9, 151.2);
        assert!(!r.from_shifted);
        assert!(r.to_shifted);
        assert!((r.to.lng - (151.2 - 360.0)).abs() < 1e-12);
    }

    #[test]
    fn westbound_pacific_route_shifts_origin() {
        // Tokyo to New York reads shorter with the origin shifted.
        let r = resolve_deg(35.7, 139.7, 40.6, -73.8);
        assert!(r.from_shifted);
        assert!(!r.to_shifted);
    }

    #[test]
    fn selected_candidate_is_minimal_among_all_four() {
        let cases = [
            (48.4, -89.3, 43.7, -79.6),
            (33.9, -118.4, -33.9, 151.2),
            (35.7, 139.7, 40.6, -73.8),
            (-36.8, 174.8, -33.9, 151.2),
        ];
        for (flat, flng, tlat, tlng) in cases {
            let chosen = resolve_deg(flat, flng, tlat, tlng);
            let chosen_dist = planar_distance_rad(chosen.from, chosen.to);
            for (fs, ts) in [(false, false), (true, false), (false, true), (true, true)] {
                let from = super::shifted(crate::math::LatLng::new(flat, flng), fs);
                let to = super::shifted(crate::math::LatLng::new(tlat, tlng), ts);
                if fs && ts && from.lng < -180.0 && to.lng < -180.0 {
                    continue;
                }
                assert!(
                    chosen_dist <= planar_distance_rad(from, to) + 1e-12,
                    "candidate ({fs}, {ts}) beats the chosen one for {flat},{flng} -> {tlat},{tlng}"
                );
            }
        }
    }

    #[test]
    fn both_shifted_below_minus_180_is_excluded() {
        // Both endpoints already sit west of -160; shifting both would land
        // the pair below -180 and ties the as-given distance anyway. The
        // as-given candidate must win.
        let r = resolve_deg(20.0, -165.0, 25.0, -170.0);
        assert!(!r.from_shifted);
        assert!(!r.to_shifted);
    }

    #[test]
    fn tie_prefers_earlier_candidate() {
        // Shifting both endpoints never changes the distance; the as-given
        // baseline must survive the tie under strict comparison.
        let r = resolve_deg(10.0, 170.0, 12.0, 175.0);
        assert!(!r.from_shifted);
        assert!(!r.to_shifted);
    }
}
