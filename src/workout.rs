//! Workout records as delivered by the record source.
//!
//! Outdoor workouts carry a GPS track; indoor (treadmill) workouts only carry a
//! distance counter. Analytics dispatch through [`TrackSource`] so callers never
//! need to inspect which kind they hold.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::metadata::{ActivityType, WorkoutMetadata};
use crate::splits::{
    compute_splits, metadata_splits, splits_from_steps, uniform_splits, Split, SplitConfig,
    SplitStep,
};
use crate::track::{mean, Track};
use crate::units::UnitPreference;

/// One reading from an indoor distance counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreadmillSample {
    pub timestamp: DateTime<Utc>,
    /// Distance covered since the start, in meters
    pub cumulative_distance_m: f64,
    pub heart_rate: Option<f64>,
    pub cadence: Option<f64>,
}

/// Time-ordered indoor distance readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreadmillSeries {
    samples: Vec<TreadmillSample>,
}

impl TreadmillSeries {
    /// Sort samples by time and drop readings with unusable distances.
    pub fn new(samples: Vec<TreadmillSample>) -> Self {
        let mut samples: Vec<TreadmillSample> = samples
            .into_iter()
            .filter(|s| s.cumulative_distance_m.is_finite() && s.cumulative_distance_m >= 0.0)
            .collect();
        samples.sort_by_key(|s| s.timestamp);
        Self { samples }
    }

    pub fn samples(&self) -> &[TreadmillSample] {
        &self.samples
    }

    pub fn duration_seconds(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => {
                (last.timestamp - first.timestamp).num_milliseconds() as f64 / 1000.0
            }
            _ => 0.0,
        }
    }

    /// Split steps between consecutive readings. A counter that goes
    /// backwards (device reset) contributes nothing for that step.
    pub fn steps(&self) -> Vec<SplitStep> {
        let mut steps = Vec::with_capacity(self.samples.len());
        if let Some(first) = self.samples.first() {
            steps.push(SplitStep {
                distance_m: 0.0,
                seconds: 0.0,
                heart_rate: first.heart_rate,
                cadence: first.cadence,
            });
        }
        for w in self.samples.windows(2) {
            let distance = w[1].cumulative_distance_m - w[0].cumulative_distance_m;
            if distance < 0.0 {
                continue;
            }
            let seconds = (w[1].timestamp - w[0].timestamp).num_milliseconds() as f64 / 1000.0;
            steps.push(SplitStep {
                distance_m: distance,
                seconds: seconds.max(0.0),
                heart_rate: w[1].heart_rate,
                cadence: w[1].cadence,
            });
        }
        steps
    }

    fn has_degenerate_timing(&self, config: &SplitConfig) -> bool {
        self.samples.len() > config.degenerate_min_points
            && self.duration_seconds() < config.degenerate_span_seconds
    }

    /// Final counter reading in meters.
    pub fn total_distance(&self) -> f64 {
        self.samples
            .last()
            .map(|s| s.cumulative_distance_m)
            .unwrap_or(0.0)
    }

    fn average_heart_rate(&self) -> Option<f64> {
        mean(self.samples.iter().filter_map(|s| s.heart_rate))
    }

    fn average_cadence(&self) -> Option<f64> {
        mean(self.samples.iter().filter_map(|s| s.cadence))
    }
}

/// A workout record of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutKind {
    Outdoor(Track, WorkoutMetadata),
    Indoor(TreadmillSeries, WorkoutMetadata),
}

/// Common analytics surface of every workout kind.
pub trait TrackSource {
    fn metadata(&self) -> &WorkoutMetadata;

    /// GPS route, if the workout has one.
    fn route(&self) -> Option<&Track>;

    fn splits(&self, unit: UnitPreference, config: &SplitConfig) -> Vec<Split>;

    fn activity_type(&self) -> ActivityType {
        self.metadata().activity_type
    }
}

impl TrackSource for WorkoutKind {
    fn metadata(&self) -> &WorkoutMetadata {
        match self {
            WorkoutKind::Outdoor(_, metadata) | WorkoutKind::Indoor(_, metadata) => metadata,
        }
    }

    fn route(&self) -> Option<&Track> {
        match self {
            WorkoutKind::Outdoor(track, _) => Some(track),
            WorkoutKind::Indoor(..) => None,
        }
    }

    fn splits(&self, unit: UnitPreference, config: &SplitConfig) -> Vec<Split> {
        match self {
            WorkoutKind::Outdoor(track, metadata) => compute_splits(track, metadata, unit, config),
            WorkoutKind::Indoor(series, metadata) => indoor_splits(series, metadata, unit, config),
        }
    }
}

/// Splits for an indoor workout, with the same fallbacks as outdoor tracks.
pub fn indoor_splits(
    series: &TreadmillSeries,
    metadata: &WorkoutMetadata,
    unit: UnitPreference,
    config: &SplitConfig,
) -> Vec<Split> {
    let unit_m = unit.unit_distance_meters();

    let splits = if series.has_degenerate_timing(config) {
        info!(
            "[Splits] Indoor series of {} samples spans {:.1}s; estimating from metadata",
            series.samples().len(),
            series.duration_seconds()
        );
        let total_m = metadata.distance_meters().unwrap_or_else(|| series.total_distance());
        uniform_splits(
            total_m,
            config.estimated_seconds_per_meter(metadata),
            unit_m,
            metadata.avg_heart_rate.or_else(|| series.average_heart_rate()),
            metadata.avg_cadence.or_else(|| series.average_cadence()),
        )
    } else {
        splits_from_steps(series.steps(), unit_m, config)
    };

    if splits.is_empty() {
        metadata_splits(metadata, unit_m, config)
    } else {
        splits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrackPoint;
    use chrono::{Duration, TimeZone};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(seconds)
    }

    fn treadmill(samples: usize, meters_per_sample: f64, seconds_per_sample: i64) -> TreadmillSeries {
        TreadmillSeries::new(
            (0..samples)
                .map(|i| TreadmillSample {
                    timestamp: at(i as i64 * seconds_per_sample),
                    cumulative_distance_m: i as f64 * meters_per_sample,
                    heart_rate: Some(150.0),
                    cadence: Some(172.0),
                })
                .collect(),
        )
    }

    #[test]
    fn test_indoor_splits_from_counter() {
        // 2.2 km at 10 m per 3 s (5:00 /km)
        let workout = WorkoutKind::Indoor(treadmill(221, 10.0, 3), WorkoutMetadata::default());
        let splits = workout.splits(UnitPreference::Metric, &SplitConfig::default());
        assert_eq!(splits.len(), 3);
        assert!((splits[0].pace - 5.0).abs() < 1e-9);
        assert_eq!(splits[0].avg_cadence, Some(172.0));
        assert!(splits[2].is_partial);
        assert!(workout.route().is_none());
    }

    #[test]
    fn test_counter_reset_is_ignored() {
        let mut samples: Vec<TreadmillSample> = treadmill(5, 100.0, 30).samples().to_vec();
        samples[3].cumulative_distance_m = 50.0;
        let series = TreadmillSeries::new(samples);
        let credited: f64 = series.steps().iter().map(|s| s.distance_m).sum();
        // 0->100->200, reset to 50 skipped, 50->400
        assert!((credited - 550.0).abs() < 1e-9);
    }

    #[test]
    fn test_indoor_degenerate_timing_uses_metadata_pace() {
        let series = TreadmillSeries::new(
            (0..50)
                .map(|i| TreadmillSample {
                    timestamp: at(0),
                    cumulative_distance_m: i as f64 * 100.0,
                    heart_rate: None,
                    cadence: None,
                })
                .collect(),
        );
        let metadata = WorkoutMetadata {
            reported_avg_pace_text: Some("6:00/km".to_string()),
            ..Default::default()
        };
        let splits = indoor_splits(&series, &metadata, UnitPreference::Metric, &SplitConfig::default());
        // Counter reached 4.9 km
        assert_eq!(splits.len(), 4);
        assert!(splits.iter().all(|s| s.is_estimated && (s.pace - 6.0).abs() < 1e-9));
    }

    #[test]
    fn test_outdoor_dispatch() {
        let track = Track::new(vec![
            TrackPoint::new(51.5, -0.12, at(0)),
            TrackPoint::new(51.501, -0.12, at(30)),
        ])
        .unwrap();
        let metadata = WorkoutMetadata {
            activity_type: ActivityType::Hike,
            ..Default::default()
        };
        let workout = WorkoutKind::Outdoor(track.clone(), metadata);
        assert_eq!(workout.route(), Some(&track));
        assert_eq!(workout.activity_type(), ActivityType::Hike);
    }
}
