//! Pace-vs-distance curve for charting.
//!
//! Finer than splits, smoother than raw samples: the track is cut into about
//! fifty equal runs of samples and each run contributes one pace point.
//! Tracks too short or too broken to give a readable curve get a flat curve
//! at the average pace instead.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::metadata::WorkoutMetadata;
use crate::track::{sample_distance, seconds_between, Track};
use crate::units::UnitPreference;

/// One bin of the pace curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct PacePoint {
    /// Cumulative distance in user units (km or mi)
    pub distance: f64,
    /// Minutes per unit, clamped for display
    pub pace: f64,
}

/// Parameters for [`build_pace_curve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaceCurveConfig {
    /// Approximate number of bins. Default: 50
    pub target_bins: usize,
    /// Smallest bin size in samples. Default: 5
    pub min_chunk_size: usize,
    /// Display clamp, minutes per unit. Default: 3.0
    pub min_pace: f64,
    /// Display clamp, minutes per unit. Default: 20.0
    pub max_pace: f64,
    /// Curves with fewer points are replaced by a flat average curve. Default: 5
    pub min_points: usize,
    /// Points in the flat average curve. Default: 5
    pub fallback_points: usize,
    /// Same meaning as in split computation. Default: 10.0 seconds
    pub degenerate_span_seconds: f64,
    /// Same meaning as in split computation. Default: 10
    pub degenerate_min_points: usize,
}

impl Default for PaceCurveConfig {
    fn default() -> Self {
        Self {
            target_bins: 50,
            min_chunk_size: 5,
            min_pace: 3.0,
            max_pace: 20.0,
            min_points: 5,
            fallback_points: 5,
            degenerate_span_seconds: 10.0,
            degenerate_min_points: 10,
        }
    }
}

impl PaceCurveConfig {
    /// Reject a display band that is inverted or not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.min_pace.is_finite() || !self.max_pace.is_finite() || self.min_pace > self.max_pace {
            return Err(AnalysisError::ConfigError {
                message: format!(
                    "pace_curve band [{}, {}] is not a valid range",
                    self.min_pace, self.max_pace
                ),
            });
        }
        Ok(())
    }

    // Applies the lower bound first, so an inverted band yields max_pace.
    fn clamp(&self, pace: f64) -> f64 {
        pace.max(self.min_pace).min(self.max_pace)
    }
}

/// Build the binned pace curve for a track.
///
/// Returns an empty curve only when no average pace can be established at all
/// (no distance covered and nothing usable in the metadata).
pub fn build_pace_curve(
    track: &Track,
    metadata: &WorkoutMetadata,
    unit: UnitPreference,
    config: &PaceCurveConfig,
) -> Vec<PacePoint> {
    let degenerate =
        track.has_degenerate_timing(config.degenerate_span_seconds, config.degenerate_min_points);

    let curve = if degenerate {
        Vec::new()
    } else {
        binned_curve(track, unit, config)
    };

    if curve.len() >= config.min_points {
        return curve;
    }

    debug!(
        "[PaceCurve] {} bins from {} samples (degenerate timing: {}); using flat average",
        curve.len(),
        track.len(),
        degenerate
    );
    average_curve(track, metadata, unit, config, degenerate)
}

fn binned_curve(track: &Track, unit: UnitPreference, config: &PaceCurveConfig) -> Vec<PacePoint> {
    let points = track.points();
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }

    let chunk = (n / config.target_bins.max(1)).max(config.min_chunk_size).max(1);
    let unit_m = unit.unit_distance_meters();
    let mut curve = Vec::with_capacity(n / chunk + 1);
    let mut cumulative = 0.0;
    let mut start = 0;

    while start < n - 1 {
        let end = (start + chunk).min(n - 1);
        let segment = &points[start..=end];
        let distance: f64 = segment
            .windows(2)
            .map(|w| sample_distance(&w[0], &w[1]))
            .sum();
        let seconds: f64 = segment
            .windows(2)
            .map(|w| seconds_between(&w[0], &w[1]).max(0.0))
            .sum();

        cumulative += distance;
        if distance > 0.0 && seconds > 0.0 {
            let pace = (seconds / distance) * unit_m / 60.0;
            curve.push(PacePoint {
                distance: cumulative / unit_m,
                pace: config.clamp(pace),
            });
        }
        start = end;
    }

    curve
}

fn average_curve(
    track: &Track,
    metadata: &WorkoutMetadata,
    unit: UnitPreference,
    config: &PaceCurveConfig,
    degenerate: bool,
) -> Vec<PacePoint> {
    let measured_distance = track.total_distance();
    let measured_duration = track.duration_seconds();

    let seconds_per_meter = if !degenerate && measured_distance > 0.0 && measured_duration > 0.0 {
        Some(measured_duration / measured_distance)
    } else {
        metadata.estimated_seconds_per_meter()
    };
    let total_m = if measured_distance > 0.0 {
        Some(measured_distance)
    } else {
        metadata.distance_meters()
    };

    let (Some(seconds_per_meter), Some(total_m)) = (seconds_per_meter, total_m) else {
        return Vec::new();
    };

    let pace = config.clamp(unit.pace_minutes_per_unit(seconds_per_meter));
    let total_units = unit.meters_to_units(total_m);
    let count = config.fallback_points.max(2);

    (0..count)
        .map(|i| PacePoint {
            distance: total_units * i as f64 / (count - 1) as f64,
            pace,
        })
        .collect()
}
