//! Track downsampling for map rendering and replay.
//!
//! A single forward pass over the raw samples with a fixed stride. Each visited
//! sample is compared with the last sample kept; it is kept when it has moved
//! far enough, when speed or course changed, or when the path turns at it.
//! Distance alone flattens slow and stationary stretches, which is why the
//! kinematic and turn checks exist.
//!
//! ## Example
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use route_analytics::{downsample, FilterConfig, Track, TrackPoint};
//!
//! let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
//! let points: Vec<TrackPoint> = (0..1000)
//!     .map(|i| TrackPoint::new(51.5 + i as f64 * 0.00005, -0.12, start + Duration::seconds(i)))
//!     .collect();
//! let track = Track::new(points).unwrap();
//!
//! let filtered = downsample(&track, &FilterConfig::default());
//! assert!(filtered.len() < track.len());
//! assert_eq!(filtered.first(), track.first());
//! assert_eq!(filtered.last(), track.last());
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geo_utils::{angle_difference, bearing};
use crate::track::{sample_distance, Track, TrackPoint};

/// Thresholds for [`downsample`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Tracks with at most this many points are returned unchanged.
    /// Default: 50
    pub small_track_threshold: usize,

    /// Approximate upper bound on output size; sets the stride.
    /// Default: 200
    pub target_points: usize,

    /// Keep a point once it is this far from the last kept point.
    /// Default: 10.0 meters
    pub min_distance_m: f64,

    /// Keep a point when its speed differs from the last kept point by more than this.
    /// Default: 1.0 m/s
    pub speed_change_mps: f64,

    /// Keep a point when its course differs from the last kept point by more than this.
    /// Default: 20.0 degrees
    pub course_change_deg: f64,

    /// Keep an interior point when incoming and outgoing bearings differ by more than this.
    /// Default: 20.0 degrees
    pub turn_angle_deg: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            small_track_threshold: 50,
            target_points: 200,
            min_distance_m: 10.0,
            speed_change_mps: 1.0,
            course_change_deg: 20.0,
            turn_angle_deg: 20.0,
        }
    }
}

/// Downsample a track, keeping its first and last samples.
///
/// The result never has more points than the input, and equals the input
/// when the input is small.
pub fn downsample(track: &Track, config: &FilterConfig) -> Track {
    let kept = downsample_points(track.points(), config);
    Track::from_sorted(kept)
}

/// Slice-level downsampling used by [`downsample`].
pub fn downsample_points(points: &[TrackPoint], config: &FilterConfig) -> Vec<TrackPoint> {
    let n = points.len();
    if n <= config.small_track_threshold.max(2) {
        return points.to_vec();
    }

    let stride = (n / config.target_points.max(1)).max(1);
    let mut kept: Vec<TrackPoint> = Vec::with_capacity(config.target_points + 2);
    kept.push(points[0].clone());
    let mut last_kept = 0usize;

    let mut i = stride;
    while i < n {
        let current = &points[i];
        let anchor = &points[last_kept];

        if should_keep(points, i, anchor, current, config) {
            kept.push(current.clone());
            last_kept = i;
        }
        i += stride;
    }

    if last_kept != n - 1 {
        kept.push(points[n - 1].clone());
    }

    debug!(
        "[Filter] Downsampled {} -> {} points (stride {})",
        n,
        kept.len(),
        stride
    );
    kept
}

fn should_keep(
    points: &[TrackPoint],
    index: usize,
    anchor: &TrackPoint,
    current: &TrackPoint,
    config: &FilterConfig,
) -> bool {
    if sample_distance(anchor, current) >= config.min_distance_m {
        return true;
    }

    if (current.speed - anchor.speed).abs() > config.speed_change_mps
        || angle_difference(current.course, anchor.course) > config.course_change_deg
    {
        return true;
    }

    if index > 0 && index + 1 < points.len() {
        let before = points[index - 1].coordinate();
        let here = current.coordinate();
        let after = points[index + 1].coordinate();
        let incoming = bearing(&before, &here);
        let outgoing = bearing(&here, &after);
        if angle_difference(incoming, outgoing) > config.turn_angle_deg {
            return true;
        }
    }

    false
}
