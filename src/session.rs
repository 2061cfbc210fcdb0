//! # Analysis Session
//!
//! Per-workout analysis state. A session owns one workout together with the
//! unit preference and configuration it is analyzed under, and computes each
//! output at most once on first request.
//!
//! ## Track usage
//!
//! - Splits, the pace curve and [`RouteAnalysis`] use the full recorded track.
//! - The map polyline, region, chart series and replay marker all use the one
//!   downsampled *display track*, so progress-based outputs never mix tracks
//!   of different lengths.
//!
//! Changing the unit preference or configuration means building a new
//! session; cached outputs are never patched in place.
//!
//! ## Example
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use route_analytics::{AnalysisSession, TrackPoint, UnitPreference, WorkoutMetadata};
//!
//! let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
//! let points: Vec<TrackPoint> = (0..600)
//!     .map(|i| TrackPoint::new(51.5 + i as f64 * 0.00003, -0.12, start + Duration::seconds(i)))
//!     .collect();
//!
//! let session = AnalysisSession::outdoor(points, WorkoutMetadata::default(), UnitPreference::Metric).unwrap();
//! assert_eq!(session.splits().len(), 2);
//! assert!(session.progress_track_len() <= 600);
//! let marker = session.position_at(0.5);
//! assert!(marker.coordinate.latitude > 51.5);
//! ```

use log::{debug, info};
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::analysis::{elevation_series, heart_rate_series, RouteAnalysis, SeriesPoint};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::filter::downsample;
use crate::interpolate::{InterpolatedPosition, PositionInterpolator};
use crate::metadata::{ActivityType, WorkoutMetadata};
use crate::pace_curve::{build_pace_curve, PacePoint};
use crate::region::{compute_region, MapRegion};
use crate::splits::Split;
use crate::track::{Track, TrackPoint};
use crate::units::{format_duration, UnitPreference};
use crate::workout::{TrackSource, WorkoutKind};
use crate::GpsPoint;

// ============================================================================
// Exported Results
// ============================================================================

/// Everything the presentation layer shows for one workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutAnalysis {
    pub activity_type: ActivityType,
    pub unit: UnitPreference,
    /// Samples in the recorded track (0 for indoor workouts)
    pub recorded_point_count: u32,
    /// Downsampled polyline for the map
    pub route: Vec<GpsPoint>,
    pub splits: Vec<Split>,
    pub pace_curve: Vec<PacePoint>,
    pub region: Option<MapRegion>,
    pub route_analysis: Option<RouteAnalysis>,
    pub elevation: Vec<SeriesPoint>,
    pub heart_rate: Vec<SeriesPoint>,
    /// e.g. "5.23 km"
    pub distance_text: Option<String>,
    /// e.g. "27:41"
    pub duration_text: Option<String>,
}

impl WorkoutAnalysis {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// Analysis Session
// ============================================================================

/// Lazily computed analytics for one workout.
pub struct AnalysisSession {
    workout: WorkoutKind,
    unit: UnitPreference,
    config: AnalysisConfig,

    // Caches
    display_track: OnceCell<Option<Track>>,
    splits: OnceCell<Vec<Split>>,
    pace_curve: OnceCell<Vec<PacePoint>>,
    region: OnceCell<Option<MapRegion>>,
    interpolator: OnceCell<PositionInterpolator>,
    route_analysis: OnceCell<Option<RouteAnalysis>>,
}

impl AnalysisSession {
    /// Create a session with the defaults for the workout's activity type.
    pub fn new(workout: WorkoutKind, unit: UnitPreference) -> Self {
        let config = AnalysisConfig::for_activity(workout.activity_type());
        Self::with_config(workout, unit, config)
    }

    /// Create a session with custom configuration.
    pub fn with_config(workout: WorkoutKind, unit: UnitPreference, config: AnalysisConfig) -> Self {
        Self {
            workout,
            unit,
            config,
            display_track: OnceCell::new(),
            splits: OnceCell::new(),
            pace_curve: OnceCell::new(),
            region: OnceCell::new(),
            interpolator: OnceCell::new(),
            route_analysis: OnceCell::new(),
        }
    }

    /// Create a session for an outdoor workout from raw samples.
    ///
    /// Fails when no sample has valid coordinates.
    pub fn outdoor(
        points: Vec<TrackPoint>,
        metadata: WorkoutMetadata,
        unit: UnitPreference,
    ) -> Result<Self> {
        let track = Track::new(points)?;
        info!(
            "[Session] Outdoor {:?} workout with {} samples",
            metadata.activity_type,
            track.len()
        );
        Ok(Self::new(WorkoutKind::Outdoor(track, metadata), unit))
    }

    pub fn workout(&self) -> &WorkoutKind {
        &self.workout
    }

    pub fn unit(&self) -> UnitPreference {
        self.unit
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Downsampled track used for every map and progress-based output.
    /// `None` for workouts without a route.
    pub fn display_track(&self) -> Option<&Track> {
        self.display_track
            .get_or_init(|| {
                self.workout.route().map(|track| {
                    let display = downsample(track, &self.config.filter);
                    debug!(
                        "[Session] Display track: {} -> {} points",
                        track.len(),
                        display.len()
                    );
                    display
                })
            })
            .as_ref()
    }

    pub fn splits(&self) -> &[Split] {
        self.splits
            .get_or_init(|| self.workout.splits(self.unit, &self.config.splits))
    }

    /// Pace curve over the recorded track; empty for indoor workouts.
    pub fn pace_curve(&self) -> &[PacePoint] {
        self.pace_curve.get_or_init(|| match self.workout.route() {
            Some(track) => build_pace_curve(
                track,
                self.workout.metadata(),
                self.unit,
                &self.config.pace_curve,
            ),
            None => Vec::new(),
        })
    }

    /// Viewport framing the display track.
    pub fn region(&self) -> Option<MapRegion> {
        *self.region.get_or_init(|| {
            let track = self.display_track()?;
            compute_region(&track.coordinates(), &self.config.region).ok()
        })
    }

    pub fn route_analysis(&self) -> Option<&RouteAnalysis> {
        self.route_analysis
            .get_or_init(|| {
                self.workout.route().map(|track| {
                    RouteAnalysis::from_track(
                        track,
                        self.splits(),
                        self.pace_curve(),
                        self.config.grade_window_m,
                    )
                })
            })
            .as_ref()
    }

    fn interpolator(&self) -> &PositionInterpolator {
        self.interpolator.get_or_init(|| match self.display_track() {
            Some(track) => PositionInterpolator::from_track(track),
            None => PositionInterpolator::new(Vec::new()),
        })
    }

    /// Number of points replay progress is spread over. Any index-based
    /// display synchronised with the marker must use the display track.
    pub fn progress_track_len(&self) -> usize {
        self.interpolator().len()
    }

    /// Replay marker at `progress` in [0, 1] along the display track.
    pub fn position_at(&self, progress: f64) -> InterpolatedPosition {
        self.interpolator().position_at(progress)
    }

    pub fn elevation_series(&self) -> Vec<SeriesPoint> {
        self.display_track()
            .map(|track| elevation_series(track, self.unit))
            .unwrap_or_default()
    }

    pub fn heart_rate_series(&self) -> Vec<SeriesPoint> {
        self.display_track()
            .map(|track| heart_rate_series(track, self.unit))
            .unwrap_or_default()
    }

    /// Total distance in meters: measured when there is a recording, else reported.
    pub fn total_distance_m(&self) -> Option<f64> {
        let measured = match &self.workout {
            WorkoutKind::Outdoor(track, _) => track.total_distance(),
            WorkoutKind::Indoor(series, _) => series.total_distance(),
        };
        if measured > 0.0 {
            Some(measured)
        } else {
            self.workout.metadata().distance_meters()
        }
    }

    /// Workout duration in seconds. Reported duration wins when the recorded
    /// timestamps are too bunched to mean anything.
    pub fn duration_seconds(&self) -> Option<f64> {
        let recorded = match &self.workout {
            WorkoutKind::Outdoor(track, _) => track.duration_seconds(),
            WorkoutKind::Indoor(series, _) => series.duration_seconds(),
        };
        if recorded >= self.config.splits.degenerate_span_seconds {
            Some(recorded)
        } else {
            self.workout.metadata().duration_seconds().or(Some(recorded))
        }
    }

    /// Compute every output and bundle it for export.
    pub fn analysis(&self) -> WorkoutAnalysis {
        let recorded_point_count = self.workout.route().map_or(0, |t| t.len() as u32);
        WorkoutAnalysis {
            activity_type: self.workout.activity_type(),
            unit: self.unit,
            recorded_point_count,
            route: self
                .display_track()
                .map(Track::coordinates)
                .unwrap_or_default(),
            splits: self.splits().to_vec(),
            pace_curve: self.pace_curve().to_vec(),
            region: self.region(),
            route_analysis: self.route_analysis().cloned(),
            elevation: self.elevation_series(),
            heart_rate: self.heart_rate_series(),
            distance_text: self
                .total_distance_m()
                .map(|m| self.unit.format_distance(m)),
            duration_text: self.duration_seconds().map(format_duration),
        }
    }
}

// ============================================================================
// Batch Analysis
// ============================================================================

/// Analyze many workouts one after another.
pub fn analyze_batch(
    workouts: Vec<WorkoutKind>,
    unit: UnitPreference,
    config: &AnalysisConfig,
) -> Vec<WorkoutAnalysis> {
    workouts
        .into_iter()
        .map(|workout| AnalysisSession::with_config(workout, unit, config.clone()).analysis())
        .collect()
}

/// Analyze many workouts across all cores. Output order matches input order.
#[cfg(feature = "parallel")]
pub fn analyze_batch_parallel(
    workouts: Vec<WorkoutKind>,
    unit: UnitPreference,
    config: &AnalysisConfig,
) -> Vec<WorkoutAnalysis> {
    use rayon::prelude::*;

    info!("[Session] Analyzing {} workouts in parallel", workouts.len());
    workouts
        .into_par_iter()
        .map(|workout| AnalysisSession::with_config(workout, unit, config.clone()).analysis())
        .collect()
}
