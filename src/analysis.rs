//! Aggregate route descriptors and chart series.
//!
//! [`RouteAnalysis`] is derived once from a track and never updated in place;
//! a changed track means a new analysis.

use serde::{Deserialize, Serialize};

use crate::pace_curve::PacePoint;
use crate::splits::Split;
use crate::track::{sample_distance, Track};
use crate::units::UnitPreference;

/// Horizontal distance over which grades are measured, in meters.
pub const DEFAULT_GRADE_WINDOW_M: f64 = 50.0;

/// Summary descriptors of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct RouteAnalysis {
    pub point_count: u32,
    /// Meters, summed over all samples
    pub total_distance_m: f64,
    pub duration_seconds: f64,
    /// Minutes per unit; lowest is fastest
    pub fastest_pace: Option<f64>,
    pub slowest_pace: Option<f64>,
    /// Percent, positive
    pub steepest_climb_grade: Option<f64>,
    /// Percent, negative
    pub steepest_descent_grade: Option<f64>,
    pub elevation_gain_m: f64,
    pub elevation_loss_m: f64,
}

impl RouteAnalysis {
    /// Derive descriptors from a track and its already computed splits and
    /// pace curve.
    ///
    /// Fastest/slowest pace come from full splits when there are any, otherwise
    /// from the pace curve.
    pub fn from_track(
        track: &Track,
        splits: &[Split],
        pace_curve: &[PacePoint],
        grade_window_m: f64,
    ) -> Self {
        let full_split_paces: Vec<f64> = splits
            .iter()
            .filter(|s| !s.is_partial)
            .map(|s| s.pace)
            .collect();
        let paces: Vec<f64> = if full_split_paces.is_empty() {
            pace_curve.iter().map(|p| p.pace).collect()
        } else {
            full_split_paces
        };

        let (gain, loss) = elevation_change(track);
        let (climb, descent) = steepest_grades(track, grade_window_m);

        Self {
            point_count: track.len() as u32,
            total_distance_m: track.total_distance(),
            duration_seconds: track.duration_seconds(),
            fastest_pace: paces.iter().copied().reduce(f64::min),
            slowest_pace: paces.iter().copied().reduce(f64::max),
            steepest_climb_grade: climb,
            steepest_descent_grade: descent,
            elevation_gain_m: gain,
            elevation_loss_m: loss,
        }
    }
}

/// Total ascent and descent in meters.
pub fn elevation_change(track: &Track) -> (f64, f64) {
    track
        .points()
        .windows(2)
        .fold((0.0, 0.0), |(gain, loss), w| {
            let delta = w[1].altitude - w[0].altitude;
            if delta > 0.0 {
                (gain + delta, loss)
            } else {
                (gain, loss - delta)
            }
        })
}

/// Steepest climb (positive) and descent (negative) in percent.
///
/// Grades are measured between samples at least `window_m` apart
/// horizontally, which keeps altitude noise on closely spaced samples from
/// producing absurd slopes.
pub fn steepest_grades(track: &Track, window_m: f64) -> (Option<f64>, Option<f64>) {
    let points = track.points();
    let cumulative = track.cumulative_distances();
    let window_m = window_m.max(1.0);

    let mut climb: Option<f64> = None;
    let mut descent: Option<f64> = None;
    let mut start = 0;

    for end in 1..points.len() {
        let horizontal = cumulative[end] - cumulative[start];
        if horizontal < window_m {
            continue;
        }
        let grade = (points[end].altitude - points[start].altitude) / horizontal * 100.0;
        if grade > 0.0 {
            climb = Some(climb.map_or(grade, |c| c.max(grade)));
        } else if grade < 0.0 {
            descent = Some(descent.map_or(grade, |d| d.min(grade)));
        }
        start = end;
    }

    (climb, descent)
}

/// One chart sample: distance along the route in user units and a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct SeriesPoint {
    pub distance: f64,
    pub value: f64,
}

/// Altitude against distance.
pub fn elevation_series(track: &Track, unit: UnitPreference) -> Vec<SeriesPoint> {
    series(track, unit, |p| Some(p.altitude))
}

/// Heart rate against distance; samples without heart rate are skipped.
pub fn heart_rate_series(track: &Track, unit: UnitPreference) -> Vec<SeriesPoint> {
    series(track, unit, |p| p.heart_rate)
}

fn series(
    track: &Track,
    unit: UnitPreference,
    value: impl Fn(&crate::TrackPoint) -> Option<f64>,
) -> Vec<SeriesPoint> {
    let points = track.points();
    let mut out = Vec::with_capacity(points.len());
    let mut cumulative = 0.0;

    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            cumulative += sample_distance(&points[i - 1], point);
        }
        if let Some(v) = value(point) {
            out.push(SeriesPoint {
                distance: unit.meters_to_units(cumulative),
                value: v,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrackPoint;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    const DEG_PER_M: f64 = 1.0 / 111_194.93;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(seconds)
    }

    /// 10 m spacing; climbs 1 m per sample for 20 samples, then drops 2 m per sample.
    fn hill() -> Track {
        let points = (0..40)
            .map(|i| {
                let altitude = if i <= 20 {
                    100.0 + i as f64
                } else {
                    120.0 - 2.0 * (i - 20) as f64
                };
                TrackPoint::new(i as f64 * 10.0 * DEG_PER_M, 0.0, at(i * 4))
                    .with_altitude(altitude)
                    .with_heart_rate(130.0 + i as f64)
            })
            .collect();
        Track::new(points).unwrap()
    }

    #[test]
    fn test_elevation_change() {
        let (gain, loss) = elevation_change(&hill());
        assert!((gain - 20.0).abs() < 1e-9);
        assert!((loss - 38.0).abs() < 1e-9);
    }

    #[test]
    fn test_steepest_grades() {
        let (climb, descent) = steepest_grades(&hill(), 50.0);
        let climb = climb.unwrap();
        let descent = descent.unwrap();
        assert!((climb - 10.0).abs() < 0.1, "climb {}", climb);
        assert!((descent + 20.0).abs() < 0.1, "descent {}", descent);
    }

    #[test]
    fn test_flat_route_has_no_grades() {
        let points = (0..20)
            .map(|i| TrackPoint::new(i as f64 * 10.0 * DEG_PER_M, 0.0, at(i)))
            .collect();
        let track = Track::new(points).unwrap();
        assert_eq!(steepest_grades(&track, 50.0), (None, None));
    }

    #[test]
    fn test_route_analysis_prefers_full_splits() {
        let split = |index: u32, pace: f64, partial: bool| Split {
            unit_index: index,
            pace,
            elapsed_seconds: pace * 60.0,
            distance_meters: 1000.0,
            avg_heart_rate: None,
            avg_cadence: None,
            is_partial: partial,
            is_estimated: false,
        };
        let splits = vec![split(1, 5.5, false), split(2, 4.9, false), split(3, 3.1, true)];
        let curve = vec![PacePoint { distance: 0.5, pace: 3.0 }];

        let analysis = RouteAnalysis::from_track(&hill(), &splits, &curve, 50.0);
        assert_eq!(analysis.point_count, 40);
        assert_eq!(analysis.fastest_pace, Some(4.9));
        assert_eq!(analysis.slowest_pace, Some(5.5));

        let from_curve = RouteAnalysis::from_track(&hill(), &[], &curve, 50.0);
        assert_eq!(from_curve.fastest_pace, Some(3.0));
    }

    #[test]
    fn test_series() {
        let track = hill();
        let elevation = elevation_series(&track, UnitPreference::Metric);
        let heart_rate = heart_rate_series(&track, UnitPreference::Metric);
        assert_eq!(elevation.len(), 40);
        assert_eq!(heart_rate.len(), 40);
        assert_eq!(elevation[0].distance, 0.0);
        assert!((elevation[39].distance - 0.39).abs() < 0.001);
        assert_eq!(heart_rate[5].value, 135.0);
    }
}
