//! Great-circle distances for the distance filter.

use geo::{Distance as _, Haversine, Point};
use park_a_don_zone_models::Coordinate;

const METERS_PER_MILE: f64 = 1_609.344;

/// Haversine distance between two coordinates, in miles.
#[must_use]
pub fn distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    let a = Point::new(a.longitude, a.latitude);
    let b = Point::new(b.longitude, b.latitude);
    Haversine.distance(a, b) / METERS_PER_MILE
}

/// Distance from `origin` to the closest vertex of `path`, in miles.
///
/// Returns `None` for an empty path.
#[must_use]
pub fn nearest_distance_miles(path: &[Coordinate], origin: Coordinate) -> Option<f64> {
    path.iter()
        .map(|c| distance_miles(*c, origin))
        .min_by(f64::total_cmp)
}
