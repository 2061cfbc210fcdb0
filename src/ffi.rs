//! FFI bindings for mobile platforms (iOS/Android).
//!
//! This module provides the UniFFI bindings that expose Rust functionality
//! to Kotlin and Swift. All FFI functions are prefixed with `ffi_` to avoid
//! naming conflicts with the internal API. Bulky results cross the boundary
//! as JSON strings.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::{
    compute_region, init_logging, AnalysisConfig, AnalysisSession, GpsPoint,
    InterpolatedPosition, MapRegion, PositionInterpolator, RegionConfig, ReplayClock, Track,
    TrackPoint, TreadmillSample, TreadmillSeries, UnitPreference, WorkoutKind, WorkoutMetadata,
};

// ============================================================================
// Boundary Types
// ============================================================================

/// A raw sample as delivered by the host platform.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub horizontal_accuracy: f64,
    pub vertical_accuracy: f64,
    pub course: f64,
    pub speed: f64,
    pub heart_rate: Option<f64>,
    pub cadence: Option<f64>,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
}

/// An indoor distance counter reading.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTreadmillSample {
    pub cumulative_distance_m: f64,
    pub heart_rate: Option<f64>,
    pub cadence: Option<f64>,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
}

fn timestamp(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

fn to_track_points(points: Vec<FfiTrackPoint>) -> Vec<TrackPoint> {
    let total = points.len();
    let converted: Vec<TrackPoint> = points
        .into_iter()
        .filter_map(|p| {
            Some(TrackPoint {
                latitude: p.latitude,
                longitude: p.longitude,
                altitude: p.altitude,
                horizontal_accuracy: p.horizontal_accuracy,
                vertical_accuracy: p.vertical_accuracy,
                course: p.course,
                speed: p.speed,
                heart_rate: p.heart_rate,
                cadence: p.cadence,
                timestamp: timestamp(p.timestamp_ms)?,
            })
        })
        .collect();
    if converted.len() < total {
        warn!(
            "[RouteAnalyticsRust] Dropped {} samples with out-of-range timestamps",
            total - converted.len()
        );
    }
    converted
}

fn analysis_json(session: &AnalysisSession) -> String {
    serde_json::to_string(&session.analysis()).unwrap_or_else(|_| "{}".to_string())
}

// ============================================================================
// Workout Analysis
// ============================================================================

/// Analyze an outdoor workout and return the full analysis as JSON.
/// Returns "{}" when no sample has valid coordinates.
#[uniffi::export]
pub fn ffi_analyze_workout(
    points: Vec<FfiTrackPoint>,
    metadata: WorkoutMetadata,
    use_metric: bool,
) -> String {
    init_logging();
    info!(
        "[RouteAnalyticsRust] ffi_analyze_workout called with {} points",
        points.len()
    );
    match AnalysisSession::outdoor(
        to_track_points(points),
        metadata,
        UnitPreference::from_metric(use_metric),
    ) {
        Ok(session) => analysis_json(&session),
        Err(e) => {
            warn!("[RouteAnalyticsRust] Analysis failed: {}", e);
            "{}".to_string()
        }
    }
}

/// Analyze an outdoor workout with configuration overrides given as JSON.
/// Invalid configuration falls back to the defaults.
#[uniffi::export]
pub fn ffi_analyze_workout_with_config(
    points: Vec<FfiTrackPoint>,
    metadata: WorkoutMetadata,
    use_metric: bool,
    config_json: String,
) -> String {
    init_logging();
    let config = AnalysisConfig::from_json(&config_json).unwrap_or_else(|e| {
        warn!("[RouteAnalyticsRust] Ignoring invalid config: {}", e);
        AnalysisConfig::for_activity(metadata.activity_type)
    });
    match Track::new(to_track_points(points)) {
        Ok(track) => {
            let session = AnalysisSession::with_config(
                WorkoutKind::Outdoor(track, metadata),
                UnitPreference::from_metric(use_metric),
                config,
            );
            analysis_json(&session)
        }
        Err(e) => {
            warn!("[RouteAnalyticsRust] Analysis failed: {}", e);
            "{}".to_string()
        }
    }
}

/// Analyze an indoor (treadmill) workout and return the analysis as JSON.
#[uniffi::export]
pub fn ffi_analyze_treadmill(
    samples: Vec<FfiTreadmillSample>,
    metadata: WorkoutMetadata,
    use_metric: bool,
) -> String {
    init_logging();
    info!(
        "[RouteAnalyticsRust] ffi_analyze_treadmill called with {} samples",
        samples.len()
    );
    let series = TreadmillSeries::new(
        samples
            .into_iter()
            .filter_map(|s| {
                Some(TreadmillSample {
                    timestamp: timestamp(s.timestamp_ms)?,
                    cumulative_distance_m: s.cumulative_distance_m,
                    heart_rate: s.heart_rate,
                    cadence: s.cadence,
                })
            })
            .collect(),
    );
    let session = AnalysisSession::new(
        WorkoutKind::Indoor(series, metadata),
        UnitPreference::from_metric(use_metric),
    );
    analysis_json(&session)
}

// ============================================================================
// Map & Replay
// ============================================================================

/// Compute a map viewport framing a route. Returns None for an empty route.
#[uniffi::export]
pub fn ffi_compute_region(points: Vec<GpsPoint>, config: RegionConfig) -> Option<MapRegion> {
    init_logging();
    compute_region(&points, &config).ok()
}

/// Format a pace (minutes per unit) for display, e.g. "6:30 /km".
#[uniffi::export]
pub fn ffi_format_pace(minutes_per_unit: f64, use_metric: bool) -> String {
    UnitPreference::from_metric(use_metric).format_pace(minutes_per_unit)
}

/// Replay marker state held on the Rust side so each animation frame is a
/// single cheap call.
#[derive(uniffi::Object)]
pub struct ReplayHandle {
    interpolator: PositionInterpolator,
    clock: ReplayClock,
}

#[uniffi::export]
impl ReplayHandle {
    /// `route` should be the display route from the workout analysis.
    #[uniffi::constructor]
    pub fn new(route: Vec<GpsPoint>, replay_duration_seconds: f64) -> Arc<Self> {
        init_logging();
        Arc::new(Self {
            interpolator: PositionInterpolator::new(route),
            clock: ReplayClock::new(replay_duration_seconds),
        })
    }

    pub fn point_count(&self) -> u32 {
        self.interpolator.len() as u32
    }

    /// Marker at `progress` in [0, 1].
    pub fn position_at(&self, progress: f64) -> InterpolatedPosition {
        self.interpolator.position_at(progress)
    }

    /// Marker after `elapsed_seconds` of looping playback.
    pub fn position_at_elapsed(&self, elapsed_seconds: f64) -> InterpolatedPosition {
        self.interpolator
            .position_at(self.clock.progress_at(elapsed_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(i: i64) -> FfiTrackPoint {
        FfiTrackPoint {
            latitude: 51.5 + i as f64 * 0.00005,
            longitude: -0.12,
            altitude: 10.0,
            horizontal_accuracy: 5.0,
            vertical_accuracy: 5.0,
            course: 0.0,
            speed: 3.0,
            heart_rate: Some(150.0),
            cadence: None,
            timestamp_ms: 1_700_000_000_000 + i * 2000,
        }
    }

    #[test]
    fn test_analyze_workout_json() {
        let points = (0..400).map(sample).collect();
        let json = ffi_analyze_workout(points, WorkoutMetadata::default(), true);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["recorded_point_count"], 400);
        assert!(!value["splits"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_analyze_empty_workout() {
        assert_eq!(ffi_analyze_workout(Vec::new(), WorkoutMetadata::default(), true), "{}");
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let points = (0..100).map(sample).collect();
        let json = ffi_analyze_workout_with_config(
            points,
            WorkoutMetadata::default(),
            false,
            "not json".to_string(),
        );
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["unit"], "Imperial");
    }

    #[test]
    fn test_inverted_pace_band_falls_back() {
        let points = (0..100).map(sample).collect();
        let json = ffi_analyze_workout_with_config(
            points,
            WorkoutMetadata::default(),
            true,
            r#"{"pace_curve": {"min_pace": 25.0, "max_pace": 20.0}}"#.to_string(),
        );
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(!value["pace_curve"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_replay_handle() {
        let handle = ReplayHandle::new(
            vec![GpsPoint::new(0.0, 0.0), GpsPoint::new(0.0, 0.01)],
            10.0,
        );
        assert_eq!(handle.point_count(), 2);
        let pos = handle.position_at_elapsed(15.0);
        assert!((pos.coordinate.longitude - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_compute_region_empty() {
        assert!(ffi_compute_region(Vec::new(), RegionConfig::default()).is_none());
    }
}
