//! Recorded workout samples and the immutable [`Track`] built from them.
//!
//! A track is validated and sorted exactly once, on construction. Everything
//! downstream borrows it read-only.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::geo_utils::haversine_distance;
use crate::GpsPoint;

/// One sensor sample from the recording device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Altitude in meters (0 if unknown)
    pub altitude: f64,
    /// Horizontal accuracy radius in meters (larger = less trustworthy)
    pub horizontal_accuracy: f64,
    /// Vertical accuracy in meters
    pub vertical_accuracy: f64,
    /// Direction of travel in degrees [0, 360), 0 if unknown
    pub course: f64,
    /// Instantaneous speed in m/s, 0 if unknown
    pub speed: f64,
    /// Heart rate in beats per minute
    pub heart_rate: Option<f64>,
    /// Cadence in steps (or revolutions) per minute
    pub cadence: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl TrackPoint {
    /// Create a sample with only a position and time; everything else unknown.
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            altitude: 0.0,
            horizontal_accuracy: 0.0,
            vertical_accuracy: 0.0,
            course: 0.0,
            speed: 0.0,
            heart_rate: None,
            cadence: None,
            timestamp,
        }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = altitude;
        self
    }

    pub fn with_motion(mut self, speed: f64, course: f64) -> Self {
        self.speed = speed;
        self.course = course;
        self
    }

    pub fn with_heart_rate(mut self, heart_rate: f64) -> Self {
        self.heart_rate = Some(heart_rate);
        self
    }

    pub fn with_cadence(mut self, cadence: f64) -> Self {
        self.cadence = Some(cadence);
        self
    }

    /// The sample's position.
    pub fn coordinate(&self) -> GpsPoint {
        GpsPoint::new(self.latitude, self.longitude)
    }

    /// Check if the sample has a usable position.
    pub fn is_valid(&self) -> bool {
        self.coordinate().is_valid()
    }
}

/// Distance in meters between two samples.
pub fn sample_distance(a: &TrackPoint, b: &TrackPoint) -> f64 {
    haversine_distance(&a.coordinate(), &b.coordinate())
}

/// Seconds from `a` to `b` (negative if `b` is earlier).
pub fn seconds_between(a: &TrackPoint, b: &TrackPoint) -> f64 {
    (b.timestamp - a.timestamp).num_milliseconds() as f64 / 1000.0
}

/// An ordered, non-empty, immutable sequence of samples for one workout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    points: Vec<TrackPoint>,
}

impl Track {
    /// Build a track from raw samples.
    ///
    /// Samples with out-of-range coordinates are dropped and the remainder is
    /// sorted by timestamp. Returns [`AnalysisError::EmptyTrack`] when nothing
    /// usable is left.
    pub fn new(points: Vec<TrackPoint>) -> Result<Self> {
        let total = points.len();
        let mut points: Vec<TrackPoint> = points.into_iter().filter(|p| p.is_valid()).collect();

        let excluded = total - points.len();
        if excluded > 0 {
            warn!(
                "[Track] Excluded {} of {} samples with invalid coordinates",
                excluded, total
            );
        }
        if points.is_empty() {
            return Err(AnalysisError::EmptyTrack);
        }

        // Stable sort keeps recording order for equal timestamps
        points.sort_by_key(|p| p.timestamp);
        debug!("[Track] Built track with {} samples", points.len());

        Ok(Self { points })
    }

    /// Wrap samples already known to be valid, sorted and non-empty.
    pub(crate) fn from_sorted(points: Vec<TrackPoint>) -> Self {
        debug_assert!(!points.is_empty());
        Self { points }
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &TrackPoint {
        &self.points[0]
    }

    pub fn last(&self) -> &TrackPoint {
        &self.points[self.points.len() - 1]
    }

    /// Positions of every sample.
    pub fn coordinates(&self) -> Vec<GpsPoint> {
        self.points.iter().map(TrackPoint::coordinate).collect()
    }

    /// Seconds between the first and last sample.
    pub fn duration_seconds(&self) -> f64 {
        seconds_between(self.first(), self.last())
    }

    /// Sum of all inter-sample distances in meters (no outlier rejection).
    pub fn total_distance(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| sample_distance(&w[0], &w[1]))
            .sum()
    }

    /// Cumulative distance in meters at each sample (first entry is 0).
    pub fn cumulative_distances(&self) -> Vec<f64> {
        let mut cumulative = Vec::with_capacity(self.points.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for w in self.points.windows(2) {
            total += sample_distance(&w[0], &w[1]);
            cumulative.push(total);
        }
        cumulative
    }

    /// True when timestamps are bunched so tightly they cannot describe the
    /// workout: more than `min_points` samples within `min_span_seconds`.
    pub fn has_degenerate_timing(&self, min_span_seconds: f64, min_points: usize) -> bool {
        self.points.len() > min_points && self.duration_seconds() < min_span_seconds
    }

    /// Mean of the heart rate samples, if any were recorded.
    pub fn average_heart_rate(&self) -> Option<f64> {
        mean(self.points.iter().filter_map(|p| p.heart_rate))
    }

    /// Mean of the cadence samples, if any were recorded.
    pub fn average_cadence(&self) -> Option<f64> {
        mean(self.points.iter().filter_map(|p| p.cadence))
    }
}

/// Arithmetic mean, `None` for an empty iterator.
pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(seconds)
    }

    #[test]
    fn test_track_sorts_by_timestamp() {
        let track = Track::new(vec![
            TrackPoint::new(51.502, -0.12, at(20)),
            TrackPoint::new(51.500, -0.12, at(0)),
            TrackPoint::new(51.501, -0.12, at(10)),
        ])
        .unwrap();

        assert_eq!(track.len(), 3);
        assert_eq!(track.first().latitude, 51.500);
        assert_eq!(track.last().latitude, 51.502);
        assert_eq!(track.duration_seconds(), 20.0);
    }

    #[test]
    fn test_track_excludes_invalid_points() {
        let track = Track::new(vec![
            TrackPoint::new(51.5, -0.12, at(0)),
            TrackPoint::new(95.0, -0.12, at(1)),
            TrackPoint::new(51.5, 200.0, at(2)),
            TrackPoint::new(f64::NAN, 0.0, at(3)),
            TrackPoint::new(51.6, -0.12, at(4)),
        ])
        .unwrap();
        assert_eq!(track.len(), 2);
    }

    #[test]
    fn test_empty_track_is_error() {
        assert_eq!(Track::new(vec![]), Err(AnalysisError::EmptyTrack));
        assert_eq!(
            Track::new(vec![TrackPoint::new(-91.0, 0.0, at(0))]),
            Err(AnalysisError::EmptyTrack)
        );
    }

    #[test]
    fn test_cumulative_distances() {
        let track = Track::new(vec![
            TrackPoint::new(0.0, 0.0, at(0)),
            TrackPoint::new(0.001, 0.0, at(10)),
            TrackPoint::new(0.002, 0.0, at(20)),
        ])
        .unwrap();
        let cumulative = track.cumulative_distances();
        assert_eq!(cumulative.len(), 3);
        assert_eq!(cumulative[0], 0.0);
        assert!((cumulative[2] - track.total_distance()).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_timing_detection() {
        let bunched: Vec<TrackPoint> = (0..20)
            .map(|i| TrackPoint::new(0.0001 * i as f64, 0.0, at(0)))
            .collect();
        let track = Track::new(bunched).unwrap();
        assert!(track.has_degenerate_timing(10.0, 10));
        // Few points are never considered degenerate
        assert!(!track.has_degenerate_timing(10.0, 50));

        let spread: Vec<TrackPoint> = (0..20)
            .map(|i| TrackPoint::new(0.0001 * i as f64, 0.0, at(i * 5)))
            .collect();
        assert!(!Track::new(spread).unwrap().has_degenerate_timing(10.0, 10));
    }

    #[test]
    fn test_sensor_averages() {
        let track = Track::new(vec![
            TrackPoint::new(0.0, 0.0, at(0)).with_heart_rate(140.0),
            TrackPoint::new(0.0, 0.0, at(1)).with_heart_rate(160.0).with_cadence(170.0),
            TrackPoint::new(0.0, 0.0, at(2)),
        ])
        .unwrap();
        assert_eq!(track.average_heart_rate(), Some(150.0));
        assert_eq!(track.average_cadence(), Some(170.0));
    }
}
