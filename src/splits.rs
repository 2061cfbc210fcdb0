//! Per-unit splits (kilometer or mile) with pace and averaged sensor values.
//!
//! Splits come from one of three paths:
//!
//! - **Measured**: walk the samples, accumulate distance and time, close a split
//!   every time cumulative distance crosses a whole unit. GPS jumps are skipped
//!   and implausible paces are dropped.
//! - **Estimated**: when timestamps are bunched into a few seconds the per-sample
//!   timing is meaningless, so every whole unit of the reported distance gets the
//!   same pace derived from workout metadata.
//! - **Metadata only**: if neither path produced anything, the reported totals
//!   alone are divided into whole units.
//!
//! ## Example
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use route_analytics::{compute_splits, SplitConfig, Track, TrackPoint, UnitPreference, WorkoutMetadata};
//!
//! // 2.5 km due north, 10 m every 3 s (5:00 /km)
//! let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
//! let points: Vec<TrackPoint> = (0..=250)
//!     .map(|i| TrackPoint::new(i as f64 * 0.0000899322, 0.0, start + Duration::seconds(i * 3)))
//!     .collect();
//! let track = Track::new(points).unwrap();
//!
//! let splits = compute_splits(&track, &WorkoutMetadata::default(), UnitPreference::Metric, &SplitConfig::default());
//! assert_eq!(splits.len(), 3);
//! assert!(splits[2].is_partial);
//! assert!((splits[0].pace - 5.0).abs() < 0.1);
//! ```

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::metadata::{ActivityType, WorkoutMetadata};
use crate::track::{mean, sample_distance, seconds_between, Track, TrackPoint};
use crate::units::{UnitPreference, METERS_PER_MILE};

/// Most whole units a single workout can be split into.
pub const MAX_SPLIT_UNITS: u32 = 10_000;

/// Analytics for one whole (or trailing partial) distance unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Split {
    /// 1-based ordinal of the kilometer/mile
    pub unit_index: u32,
    /// Minutes per unit distance
    pub pace: f64,
    /// Time credited to this unit in seconds
    pub elapsed_seconds: f64,
    /// Distance credited to this unit in meters
    pub distance_meters: f64,
    pub avg_heart_rate: Option<f64>,
    pub avg_cadence: Option<f64>,
    /// Trailing segment shorter than one unit
    pub is_partial: bool,
    /// Pace derived from workout metadata rather than sample timing
    pub is_estimated: bool,
}

/// Thresholds for split computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Segments longer than this are GPS jump candidates.
    /// Default: 100.0 meters
    pub jump_threshold_m: f64,

    /// A jump candidate is only rejected when its implied speed also exceeds this.
    /// Set to 0.0 to reject on distance alone.
    /// Default: 25.0 m/s
    pub max_segment_speed_mps: f64,

    /// Fastest believable measured pace (minutes per unit).
    /// Default: 3.0
    pub min_plausible_pace: f64,

    /// Slowest believable measured pace (minutes per unit).
    /// Default: 30.0
    pub max_plausible_pace: f64,

    /// A trailing partial is emitted once it exceeds this fraction of a unit...
    /// Default: 0.2
    pub partial_min_fraction: f64,

    /// ...or this many meters, whichever is smaller.
    /// Default: 100.0
    pub partial_min_meters: f64,

    /// Timestamp span under which a track is considered chronologically degenerate.
    /// Default: 10.0 seconds
    pub degenerate_span_seconds: f64,

    /// Degenerate detection only applies to tracks with more points than this.
    /// Default: 10
    pub degenerate_min_points: usize,

    /// Pace assumed when metadata offers nothing usable.
    /// Default: 600.0 seconds per mile (10:00 /mi)
    pub default_seconds_per_mile: f64,

    /// Metadata-only splits need a reported duration above this.
    /// Default: 10.0 seconds
    pub min_metadata_duration_s: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            jump_threshold_m: 100.0,
            max_segment_speed_mps: 25.0,
            min_plausible_pace: 3.0,
            max_plausible_pace: 30.0,
            partial_min_fraction: 0.2,
            partial_min_meters: 100.0,
            degenerate_span_seconds: 10.0,
            degenerate_min_points: 10,
            default_seconds_per_mile: 600.0,
            min_metadata_duration_s: 10.0,
        }
    }
}

impl SplitConfig {
    /// Defaults tuned for an activity. Cycling routinely beats 3:00 /km and
    /// covers long gaps between samples at speed.
    pub fn for_activity(activity: ActivityType) -> Self {
        match activity {
            ActivityType::Bike => Self {
                min_plausible_pace: 1.0,
                max_segment_speed_mps: 35.0,
                ..Self::default()
            },
            ActivityType::Run | ActivityType::Walk | ActivityType::Hike => Self::default(),
        }
    }

    /// Minimum trailing distance (meters) that still yields a partial split.
    pub fn partial_threshold(&self, unit_meters: f64) -> f64 {
        (self.partial_min_fraction * unit_meters).min(self.partial_min_meters)
    }

    /// Metadata pace estimate, or the default pace when metadata has none.
    pub fn estimated_seconds_per_meter(&self, metadata: &WorkoutMetadata) -> f64 {
        metadata
            .estimated_seconds_per_meter()
            .unwrap_or(self.default_seconds_per_mile / METERS_PER_MILE)
    }

    /// Reject a plausible-pace band that is inverted or not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.min_plausible_pace.is_finite()
            || !self.max_plausible_pace.is_finite()
            || self.min_plausible_pace > self.max_plausible_pace
        {
            return Err(AnalysisError::ConfigError {
                message: format!(
                    "splits plausible pace band [{}, {}] is not a valid range",
                    self.min_plausible_pace, self.max_plausible_pace
                ),
            });
        }
        Ok(())
    }

    fn is_plausible(&self, pace: f64) -> bool {
        pace.is_finite() && pace >= self.min_plausible_pace && pace <= self.max_plausible_pace
    }
}

/// One increment of movement fed into split accumulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitStep {
    pub distance_m: f64,
    pub seconds: f64,
    pub heart_rate: Option<f64>,
    pub cadence: Option<f64>,
}

impl SplitStep {
    /// A zero-length step carrying only a sample's sensor readings.
    pub fn sensors_only(point: &TrackPoint) -> Self {
        Self {
            distance_m: 0.0,
            seconds: 0.0,
            heart_rate: point.heart_rate,
            cadence: point.cadence,
        }
    }
}

/// Segments skipped as GPS jumps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpStats {
    pub segments: usize,
    pub distance_m: f64,
    pub seconds: f64,
}

/// Compute splits for a track, choosing the measured or estimated path and
/// falling back to metadata-only splits when both come up empty.
pub fn compute_splits(
    track: &Track,
    metadata: &WorkoutMetadata,
    unit: UnitPreference,
    config: &SplitConfig,
) -> Vec<Split> {
    let unit_m = unit.unit_distance_meters();

    let splits = if track.has_degenerate_timing(config.degenerate_span_seconds, config.degenerate_min_points)
    {
        info!(
            "[Splits] {} samples span {:.1}s; estimating splits from metadata",
            track.len(),
            track.duration_seconds()
        );
        estimate_splits(track, metadata, unit_m, config)
    } else {
        let (steps, jumps) = track_steps(track, config);
        if jumps.segments > 0 {
            debug!(
                "[Splits] Excluded {} GPS jumps ({:.0}m, {:.0}s)",
                jumps.segments, jumps.distance_m, jumps.seconds
            );
        }
        splits_from_steps(steps, unit_m, config)
    };

    if !splits.is_empty() {
        return splits;
    }

    let fallback = metadata_splits(metadata, unit_m, config);
    if !fallback.is_empty() {
        info!(
            "[Splits] No splits from samples; using {} metadata splits",
            fallback.len()
        );
    }
    fallback
}

/// Convert a track into split steps, skipping GPS jumps.
pub fn track_steps(track: &Track, config: &SplitConfig) -> (Vec<SplitStep>, JumpStats) {
    let points = track.points();
    let mut steps = Vec::with_capacity(points.len());
    let mut jumps = JumpStats::default();

    steps.push(SplitStep::sensors_only(track.first()));

    for w in points.windows(2) {
        let distance = sample_distance(&w[0], &w[1]);
        let seconds = seconds_between(&w[0], &w[1]).max(0.0);

        if is_jump(distance, seconds, config) {
            jumps.segments += 1;
            jumps.distance_m += distance;
            jumps.seconds += seconds;
            continue;
        }

        steps.push(SplitStep {
            distance_m: distance,
            seconds,
            heart_rate: w[1].heart_rate,
            cadence: w[1].cadence,
        });
    }

    (steps, jumps)
}

fn is_jump(distance: f64, seconds: f64, config: &SplitConfig) -> bool {
    if distance <= config.jump_threshold_m {
        return false;
    }
    if seconds <= 0.0 {
        return true;
    }
    distance / seconds > config.max_segment_speed_mps
}

/// Accumulate steps into whole-unit splits plus a trailing partial.
///
/// A step that crosses one or more unit boundaries is apportioned between the
/// units it spans, with time split in proportion to distance. Its sensor
/// readings count toward every unit it contributes distance to.
///
/// Splits whose pace falls outside the plausible band are discarded; the unit
/// ordinal still advances so later splits keep their true kilometer/mile number.
pub fn splits_from_steps(
    steps: impl IntoIterator<Item = SplitStep>,
    unit_meters: f64,
    config: &SplitConfig,
) -> Vec<Split> {
    let mut splits = Vec::new();
    if !(unit_meters > 0.0) || !unit_meters.is_finite() {
        return splits;
    }

    let mut acc = SplitAccumulator::default();
    let mut cumulative = 0.0;
    let mut unit_index: u32 = 1;

    for step in steps {
        let mut remaining = step;
        loop {
            let boundary = unit_index as f64 * unit_meters;
            let needed = boundary - cumulative;
            if remaining.distance_m < needed {
                cumulative += remaining.distance_m;
                acc.add(&remaining);
                break;
            }

            if unit_index > MAX_SPLIT_UNITS {
                warn!(
                    "[Splits] Distance exceeds {} units; stopping split accumulation",
                    MAX_SPLIT_UNITS
                );
                return splits;
            }

            let fraction = if remaining.distance_m > 0.0 {
                needed / remaining.distance_m
            } else {
                1.0
            };
            let head = SplitStep {
                distance_m: needed,
                seconds: remaining.seconds * fraction,
                ..remaining
            };
            acc.add(&head);
            if let Some(split) = acc.close(unit_index, unit_meters, false, config) {
                splits.push(split);
            }
            acc = SplitAccumulator::default();
            unit_index += 1;
            cumulative = boundary;

            remaining.distance_m -= head.distance_m;
            remaining.seconds -= head.seconds;
            if remaining.distance_m <= 0.0 {
                break;
            }
        }
    }

    if acc.distance_m > config.partial_threshold(unit_meters) {
        if let Some(split) = acc.close(unit_index, unit_meters, true, config) {
            splits.push(split);
        }
    }

    splits
}

#[derive(Default)]
struct SplitAccumulator {
    distance_m: f64,
    seconds: f64,
    heart_rates: Vec<f64>,
    cadences: Vec<f64>,
}

impl SplitAccumulator {
    fn add(&mut self, step: &SplitStep) {
        self.distance_m += step.distance_m;
        self.seconds += step.seconds;
        self.heart_rates.extend(step.heart_rate);
        self.cadences.extend(step.cadence);
    }

    fn close(
        &self,
        unit_index: u32,
        unit_meters: f64,
        is_partial: bool,
        config: &SplitConfig,
    ) -> Option<Split> {
        if self.distance_m <= 0.0 {
            return None;
        }
        let pace = (self.seconds / self.distance_m) * unit_meters / 60.0;
        if !config.is_plausible(pace) {
            debug!(
                "[Splits] Discarding unit {} with implausible pace {:.2}",
                unit_index, pace
            );
            return None;
        }

        Some(Split {
            unit_index,
            pace,
            elapsed_seconds: self.seconds,
            distance_meters: self.distance_m,
            avg_heart_rate: mean(self.heart_rates.iter().copied()),
            avg_cadence: mean(self.cadences.iter().copied()),
            is_partial,
            is_estimated: false,
        })
    }
}

/// Splits for a track whose timestamps cannot be trusted.
///
/// Every whole unit of the reported distance (or the measured distance when
/// none is reported) gets the same metadata-derived pace and the overall
/// sensor averages. The plausibility band is not applied.
pub fn estimate_splits(
    track: &Track,
    metadata: &WorkoutMetadata,
    unit_meters: f64,
    config: &SplitConfig,
) -> Vec<Split> {
    let seconds_per_meter = config.estimated_seconds_per_meter(metadata);
    let total_m = metadata
        .distance_meters()
        .unwrap_or_else(|| track.total_distance());

    uniform_splits(
        total_m,
        seconds_per_meter,
        unit_meters,
        metadata.avg_heart_rate.or_else(|| track.average_heart_rate()),
        metadata.avg_cadence.or_else(|| track.average_cadence()),
    )
}

/// Splits synthesized from metadata totals alone.
///
/// Requires a positive reported distance and a reported duration above
/// `min_metadata_duration_s`; otherwise returns nothing.
pub fn metadata_splits(
    metadata: &WorkoutMetadata,
    unit_meters: f64,
    config: &SplitConfig,
) -> Vec<Split> {
    let (Some(total_m), Some(duration)) = (metadata.distance_meters(), metadata.duration_seconds())
    else {
        return Vec::new();
    };
    if duration <= config.min_metadata_duration_s {
        return Vec::new();
    }

    let seconds_per_meter = metadata
        .pace_seconds_per_meter()
        .unwrap_or(duration / total_m);

    uniform_splits(
        total_m,
        seconds_per_meter,
        unit_meters,
        metadata.avg_heart_rate,
        metadata.avg_cadence,
    )
}

/// Whole-unit splits sharing one pace and one set of sensor averages.
pub fn uniform_splits(
    total_m: f64,
    seconds_per_meter: f64,
    unit_meters: f64,
    avg_heart_rate: Option<f64>,
    avg_cadence: Option<f64>,
) -> Vec<Split> {
    if !(total_m > 0.0) || !(seconds_per_meter > 0.0) || !seconds_per_meter.is_finite() {
        return Vec::new();
    }

    // Tolerate float noise so "5.0 mi" is five whole miles
    let units = total_m / unit_meters + 1e-9;
    if !units.is_finite() || units >= MAX_SPLIT_UNITS as f64 + 1.0 {
        warn!(
            "[Splits] {:.0}m is more than {} units; not synthesizing splits",
            total_m, MAX_SPLIT_UNITS
        );
        return Vec::new();
    }
    let whole_units = units.floor() as u32;
    let elapsed = seconds_per_meter * unit_meters;

    (1..=whole_units)
        .map(|unit_index| Split {
            unit_index,
            pace: elapsed / 60.0,
            elapsed_seconds: elapsed,
            distance_meters: unit_meters,
            avg_heart_rate,
            avg_cadence,
            is_partial: false,
            is_estimated: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    /// Degrees of latitude per meter along a meridian (haversine sphere)
    const DEG_PER_M: f64 = 1.0 / 111_194.93;

    fn at_ms(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::milliseconds(ms)
    }

    /// Northbound track with `n` points, `spacing_m` apart, `interval_s` between samples.
    fn uniform_track(n: usize, spacing_m: f64, interval_s: f64) -> Track {
        let points = (0..n)
            .map(|i| {
                TrackPoint::new(
                    i as f64 * spacing_m * DEG_PER_M,
                    0.0,
                    at_ms((i as f64 * interval_s * 1000.0) as i64),
                )
            })
            .collect();
        Track::new(points).unwrap()
    }

    fn step(distance_m: f64, seconds: f64) -> SplitStep {
        SplitStep {
            distance_m,
            seconds,
            heart_rate: None,
            cadence: None,
        }
    }

    #[test]
    fn test_measured_splits_metric() {
        // 2.5 km at 5:00 /km: 10 m every 3 s
        let track = uniform_track(251, 10.0, 3.0);
        let splits = compute_splits(
            &track,
            &WorkoutMetadata::default(),
            UnitPreference::Metric,
            &SplitConfig::default(),
        );

        assert_eq!(splits.len(), 3);
        for (i, split) in splits.iter().enumerate() {
            assert_eq!(split.unit_index, i as u32 + 1);
            assert!((split.pace - 5.0).abs() < 0.05, "pace {}", split.pace);
            assert!(!split.is_estimated);
        }
        assert!(!splits[0].is_partial);
        assert!(!splits[1].is_partial);
        assert!(splits[2].is_partial);
        assert!((splits[2].distance_meters - 500.0).abs() < 15.0);
    }

    #[test]
    fn test_elapsed_never_exceeds_duration() {
        let track = uniform_track(400, 8.0, 2.5);
        let splits = compute_splits(
            &track,
            &WorkoutMetadata::default(),
            UnitPreference::Imperial,
            &SplitConfig::default(),
        );
        let total: f64 = splits.iter().map(|s| s.elapsed_seconds).sum();
        assert!(total <= track.duration_seconds() + 1e-6);
        assert!(splits.windows(2).all(|w| w[0].unit_index < w[1].unit_index));
    }

    #[test]
    fn test_sensor_averages_reset_per_split() {
        let steps = (0..20).map(|i| SplitStep {
            distance_m: 100.0,
            seconds: 30.0,
            heart_rate: Some(if i < 10 { 140.0 } else { 160.0 }),
            cadence: None,
        });
        let splits = splits_from_steps(steps, 1000.0, &SplitConfig::default());
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].avg_heart_rate, Some(140.0));
        assert_eq!(splits[1].avg_heart_rate, Some(160.0));
        assert_eq!(splits[0].avg_cadence, None);
    }

    #[test]
    fn test_implausible_split_discarded_but_ordinal_advances() {
        // First kilometer in 60 s (1:00 /km), second at 5:00 /km
        let mut steps: Vec<SplitStep> = (0..10).map(|_| step(100.0, 6.0)).collect();
        steps.extend((0..10).map(|_| step(100.0, 30.0)));
        let splits = splits_from_steps(steps, 1000.0, &SplitConfig::default());
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].unit_index, 2);
        assert!((splits[0].pace - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_threshold() {
        let config = SplitConfig::default();
        assert_eq!(config.partial_threshold(1000.0), 100.0);

        // 1 km + 80 m: the trailing 80 m is dropped
        let mut steps: Vec<SplitStep> = (0..10).map(|_| step(100.0, 30.0)).collect();
        steps.push(step(80.0, 24.0));
        let splits = splits_from_steps(steps, 1000.0, &config);
        assert_eq!(splits.len(), 1);

        // 1 km + 150 m: kept as a partial
        let mut steps: Vec<SplitStep> = (0..10).map(|_| step(100.0, 30.0)).collect();
        steps.push(step(150.0, 45.0));
        let splits = splits_from_steps(steps, 1000.0, &config);
        assert_eq!(splits.len(), 2);
        assert!(splits[1].is_partial);
        assert_eq!(splits[1].unit_index, 2);
    }

    #[test]
    fn test_partial_must_exceed_threshold() {
        // 1 km + exactly 100 m: not a partial
        let mut steps: Vec<SplitStep> = (0..10).map(|_| step(100.0, 30.0)).collect();
        steps.push(step(100.0, 30.0));
        assert_eq!(splits_from_steps(steps, 1000.0, &SplitConfig::default()).len(), 1);
    }

    #[test]
    fn test_long_step_spans_several_units() {
        let reading = |distance_m: f64, seconds: f64, hr: f64| SplitStep {
            distance_m,
            seconds,
            heart_rate: Some(hr),
            cadence: None,
        };
        // 500 m, then one 2.1 km step (e.g. a tunnel), then 1 km in 100 m steps
        let mut steps = vec![reading(500.0, 150.0, 140.0), reading(2100.0, 630.0, 150.0)];
        steps.extend((0..10).map(|_| reading(100.0, 30.0, 160.0)));

        let splits = splits_from_steps(steps, 1000.0, &SplitConfig::default());
        assert_eq!(splits.len(), 4);
        for (i, split) in splits.iter().enumerate() {
            assert_eq!(split.unit_index, i as u32 + 1);
            assert!((split.pace - 5.0).abs() < 1e-9, "pace {}", split.pace);
        }
        for split in &splits[..3] {
            assert!(!split.is_partial);
            assert!((split.distance_meters - 1000.0).abs() < 1e-9);
            assert!((split.elapsed_seconds - 300.0).abs() < 1e-9);
        }
        assert!(splits[3].is_partial);
        assert!((splits[3].distance_meters - 600.0).abs() < 1e-9);

        assert_eq!(splits[0].avg_heart_rate, Some(145.0));
        assert_eq!(splits[1].avg_heart_rate, Some(150.0));
        assert_eq!(splits[2].avg_heart_rate, Some(158.0));
        assert_eq!(splits[3].avg_heart_rate, Some(160.0));
    }

    #[test]
    fn test_validate_rejects_inverted_band() {
        let config = SplitConfig {
            min_plausible_pace: 40.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AnalysisError::ConfigError { .. })));
        assert!(SplitConfig::default().validate().is_ok());
        assert!(SplitConfig::for_activity(ActivityType::Bike).validate().is_ok());
    }

    #[test]
    fn test_gps_jump_is_skipped() {
        // 5 m every second, with a 500 m teleport between samples 100 and 101
        let mut points: Vec<TrackPoint> = Vec::new();
        let mut lat = 0.0;
        for i in 0..300 {
            if i == 101 {
                lat += 500.0 * DEG_PER_M;
            } else if i > 0 {
                lat += 5.0 * DEG_PER_M;
            }
            points.push(TrackPoint::new(lat, 0.0, at_ms(i * 1000)));
        }
        let track = Track::new(points).unwrap();
        let (steps, jumps) = track_steps(&track, &SplitConfig::default());

        assert_eq!(jumps.segments, 1);
        assert!((jumps.seconds - 1.0).abs() < 1e-9);
        assert_eq!(steps.len(), 299);
        let credited: f64 = steps.iter().map(|s| s.distance_m).sum();
        assert!((credited - 298.0 * 5.0).abs() < 1.0);
    }

    #[test]
    fn test_slow_long_segment_is_not_a_jump() {
        let config = SplitConfig::default();
        // 133 m in 53 s is a normal run pace with sparse sampling
        assert!(!is_jump(133.0, 53.0, &config));
        assert!(is_jump(500.0, 1.0, &config));
        assert!(is_jump(150.0, 0.0, &config));

        let strict = SplitConfig {
            max_segment_speed_mps: 0.0,
            ..SplitConfig::default()
        };
        assert!(is_jump(133.0, 53.0, &strict));
    }

    #[test]
    fn test_degenerate_timing_uses_metadata_pace() {
        // 300 points over 3 km, all within one second
        let points: Vec<TrackPoint> = (0..300)
            .map(|i| TrackPoint::new(i as f64 * 10.0 * DEG_PER_M, 0.0, at_ms(i * 3)))
            .collect();
        let track = Track::new(points).unwrap();
        let metadata = WorkoutMetadata {
            reported_distance_text: Some("3.2 km".to_string()),
            reported_avg_pace_text: Some("5:30/km".to_string()),
            avg_heart_rate: Some(151.0),
            ..Default::default()
        };

        let splits = compute_splits(&track, &metadata, UnitPreference::Metric, &SplitConfig::default());
        assert_eq!(splits.len(), 3);
        for split in &splits {
            assert!((split.pace - 5.5).abs() < 1e-9);
            assert_eq!(split.avg_heart_rate, Some(151.0));
            assert!(split.is_estimated);
        }
    }

    #[test]
    fn test_degenerate_timing_without_metadata_uses_default_pace() {
        let points: Vec<TrackPoint> = (0..200)
            .map(|i| TrackPoint::new(i as f64 * 10.0 * DEG_PER_M, 0.0, at_ms(i)))
            .collect();
        let track = Track::new(points).unwrap();
        let splits = compute_splits(
            &track,
            &WorkoutMetadata::default(),
            UnitPreference::Imperial,
            &SplitConfig::default(),
        );
        // ~1990 m of track is one whole mile at 10:00 /mi
        assert_eq!(splits.len(), 1);
        assert!((splits[0].pace - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_metadata_only_fallback() {
        // A single point produces no measured splits
        let track = Track::new(vec![TrackPoint::new(0.0, 0.0, at_ms(0))]).unwrap();
        let metadata = WorkoutMetadata {
            reported_distance_text: Some("3.1 mi".to_string()),
            reported_duration_text: Some("31:00".to_string()),
            ..Default::default()
        };
        let splits = compute_splits(&track, &metadata, UnitPreference::Imperial, &SplitConfig::default());
        assert_eq!(splits.len(), 3);
        // 31:00 over 3.1 mi is 10:00 /mi
        assert!((splits[0].pace - 10.0).abs() < 1e-6);
        assert!(splits.iter().all(|s| s.is_estimated));
    }

    #[test]
    fn test_metadata_only_requires_duration() {
        let metadata = WorkoutMetadata {
            reported_distance_text: Some("3.1 mi".to_string()),
            reported_duration_text: Some("0:05".to_string()),
            ..Default::default()
        };
        assert!(metadata_splits(&metadata, METERS_PER_MILE, &SplitConfig::default()).is_empty());
        assert!(metadata_splits(&WorkoutMetadata::default(), 1000.0, &SplitConfig::default()).is_empty());
    }

    #[test]
    fn test_absurd_reported_distance_yields_no_splits() {
        let track = Track::new(vec![TrackPoint::new(0.0, 0.0, at_ms(0))]).unwrap();
        let metadata = WorkoutMetadata {
            reported_distance_text: Some("4294967296 km".to_string()),
            reported_duration_text: Some("45:00".to_string()),
            ..Default::default()
        };
        let splits = compute_splits(&track, &metadata, UnitPreference::Metric, &SplitConfig::default());
        assert!(splits.is_empty());

        assert!(uniform_splits(f64::MAX, 0.3, 1000.0, None, None).is_empty());
        let capped = uniform_splits(MAX_SPLIT_UNITS as f64 * 1000.0, 0.3, 1000.0, None, None);
        assert_eq!(capped.len(), MAX_SPLIT_UNITS as usize);
    }

    #[test]
    fn test_bike_config_accepts_fast_paces() {
        // 1 km in 100 s is 36 km/h
        let steps: Vec<SplitStep> = (0..10).map(|_| step(100.0, 10.0)).collect();
        assert!(splits_from_steps(steps.clone(), 1000.0, &SplitConfig::default()).is_empty());
        let bike = SplitConfig::for_activity(ActivityType::Bike);
        assert_eq!(splits_from_steps(steps, 1000.0, &bike).len(), 1);
    }
}
