//! Geographic math for venue search.
//!
//! Distances are statute miles end-to-end (the product's display unit); the
//! bounding-box prefilter works in degrees. Both are deliberately simple
//! approximations suitable for city-scale searches.

/// Earth radius in statute miles, used by the Haversine formula.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Rough conversion factor: one degree of latitude ≈ 111 km.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Great-circle distance between two points in statute miles (Haversine).
pub fn haversine_miles(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Latitude/longitude range used to prefilter venues before exact distance
/// computation.
///
/// This is a flat-earth approximation: the same degree delta is applied to
/// both axes with no longitude convergence correction. It is a coarse
/// prefilter only; rows are distance-sorted with [`haversine_miles`]
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Build a box of `radius_meters` around a center point.
    pub fn around(lat: f64, lng: f64, radius_meters: f64) -> Self {
        let delta = radius_meters / METERS_PER_DEGREE;
        Self {
            min_lat: lat - delta,
            max_lat: lat + delta,
            min_lng: lng - delta,
            max_lng: lng + delta,
        }
    }

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NYC: (f64, f64) = (40.7128, -74.0060);
    const PHILLY: (f64, f64) = (39.9526, -75.1652);

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_miles(NYC.0, NYC.1, PHILLY.0, PHILLY.1);
        let ba = haversine_miles(PHILLY.0, PHILLY.1, NYC.0, NYC.1);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_miles(NYC.0, NYC.1, NYC.0, NYC.1), 0.0);
    }

    #[test]
    fn nyc_to_philly_is_about_eighty_miles() {
        let d = haversine_miles(NYC.0, NYC.1, PHILLY.0, PHILLY.1);
        assert!((79.0..82.0).contains(&d), "got {d}");
    }

    #[test]
    fn distance_is_positive_for_distinct_points() {
        let d = haversine_miles(NYC.0, NYC.1, NYC.0 + 0.001, NYC.1);
        assert!(d > 0.0);
    }

    #[test]
    fn bounding_box_delta_matches_flat_earth_conversion() {
        let bbox = BoundingBox::around(NYC.0, NYC.1, 5000.0);
        let delta = 5000.0 / METERS_PER_DEGREE;
        assert!((bbox.max_lat - NYC.0 - delta).abs() < 1e-12);
        assert!((NYC.0 - bbox.min_lat - delta).abs() < 1e-12);
        assert!((bbox.max_lng - NYC.1 - delta).abs() < 1e-12);
    }

    #[test]
    fn bounding_box_contains_center_and_excludes_far_points() {
        let bbox = BoundingBox::around(NYC.0, NYC.1, 5000.0);
        assert!(bbox.contains(NYC.0, NYC.1));
        assert!(!bbox.contains(PHILLY.0, PHILLY.1));
    }
}
