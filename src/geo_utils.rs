//! Geographic utilities: great-circle distance, bearings and bounding boxes.
//!
//! Everything else in the crate measures the world through these helpers, so
//! distances are always meters and angles are always degrees.

use geo::{Distance, Haversine, Point};

use crate::error::{OptionExt, Result};
use crate::{Bounds, GpsPoint};

/// Calculate haversine distance between two GPS points in meters.
///
/// # Example
/// ```
/// use route_analytics::GpsPoint;
/// use route_analytics::geo_utils::haversine_distance;
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
/// let km = haversine_distance(&london, &paris) / 1000.0;
/// assert!(km > 330.0 && km < 350.0);
/// ```
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Initial great-circle bearing from `from` to `to`, in degrees within [0, 360).
///
/// Identical points have no defined bearing and return 0.
pub fn bearing(from: &GpsPoint, to: &GpsPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lng = (to.longitude - from.longitude).to_radians();

    let y = d_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }

    let mut degrees = y.atan2(x).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    // atan2 can round to exactly 360 for tiny negative angles
    if degrees >= 360.0 {
        degrees -= 360.0;
    }
    degrees
}

/// Smallest absolute difference between two headings, in [0, 180].
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Bounding box of a set of points.
///
/// Callers must not pass an empty slice; doing so is reported as
/// [`crate::AnalysisError::EmptyTrack`].
pub fn compute_bounds(points: &[GpsPoint]) -> Result<Bounds> {
    let first = points.first().ok_or_empty_track()?;

    let mut min_lat = first.latitude;
    let mut max_lat = first.latitude;
    let mut min_lng = first.longitude;
    let mut max_lng = first.longitude;

    for p in &points[1..] {
        min_lat = min_lat.min(p.latitude);
        max_lat = max_lat.max(p.latitude);
        min_lng = min_lng.min(p.longitude);
        max_lng = max_lng.max(p.longitude);
    }

    Ok(Bounds {
        min_lat,
        max_lat,
        min_lng,
        max_lng,
    })
}
