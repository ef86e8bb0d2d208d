//! Geographic utilities: great-circle distance and missing-value predicates.

use crate::GpsPoint;

/// Mean Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters (haversine formula).
///
/// # Example
/// ```
/// use sportgems::GpsPoint;
/// use sportgems::geo_utils::haversine_distance;
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
/// let km = haversine_distance(&london, &paris) / 1000.0;
/// assert!(km > 340.0 && km < 350.0);
/// ```
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (p2.longitude - p1.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
}

/// True iff latitude or longitude is NaN.
pub fn is_missing_coordinate(p: &GpsPoint) -> bool {
    p.latitude.is_nan() || p.longitude.is_nan()
}

/// True iff the value is NaN.
pub fn is_missing_scalar(x: f64) -> bool {
    x.is_nan()
}

/// Total length of a polyline in meters, skipping missing points.
pub fn polyline_length(points: &[GpsPoint]) -> f64 {
    let mut total = 0.0;
    let mut previous: Option<&GpsPoint> = None;
    for point in points.iter().filter(|p| !is_missing_coordinate(p)) {
        if let Some(prev) = previous {
            total += haversine_distance(prev, point);
        }
        previous = Some(point);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        let p1 = GpsPoint::new(51.5074, -0.1278); // London
        let p2 = GpsPoint::new(48.8566, 2.3522); // Paris
        let dist = haversine_distance(&p1, &p2);
        // London to Paris is about 344 km
        assert!(dist > 340_000.0 && dist < 350_000.0);
        assert!((dist - haversine_distance(&p2, &p1)).abs() < 1e-6);
    }

    #[test]
    fn test_haversine_same_point() {
        let p = GpsPoint::new(48.0, 8.0);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_small_step() {
        // 0.0002° of longitude at 48°N is just under 15m
        let d = haversine_distance(&GpsPoint::new(48.0, 8.0), &GpsPoint::new(48.0, 8.0002));
        assert!((d - 14.88).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_missing_predicates() {
        assert!(is_missing_coordinate(&GpsPoint::new(f64::NAN, 1.0)));
        assert!(is_missing_coordinate(&GpsPoint::new(1.0, f64::NAN)));
        assert!(is_missing_coordinate(&GpsPoint::new(f64::NAN, f64::NAN)));
        assert!(!is_missing_coordinate(&GpsPoint::new(0.0, 0.0)));
        assert!(is_missing_scalar(f64::NAN));
        assert!(!is_missing_scalar(0.0));
    }

    #[test]
    fn test_polyline_length_skips_missing() {
        let points = vec![
            GpsPoint::new(48.0, 8.0),
            GpsPoint::new(f64::NAN, 8.0001),
            GpsPoint::new(48.0, 8.0002),
        ];
        let expected = haversine_distance(&points[0], &points[2]);
        assert!((polyline_length(&points) - expected).abs() < 1e-9);
        assert_eq!(polyline_length(&[]), 0.0);
    }
}
