//! Progress-to-position interpolation for animated route replay.
//!
//! A replay marker runs from the start of the route (`progress = 0`) to the end
//! (`progress = 1`) over a fixed wall-clock duration and then loops. Progress is
//! mapped to a fractional sample index, so the same track must be used for
//! every progress-based display within one analysis session.
//!
//! ## Example
//! ```rust
//! use route_analytics::{GpsPoint, PositionInterpolator};
//!
//! let interpolator = PositionInterpolator::new(vec![
//!     GpsPoint::new(0.0, 0.0),
//!     GpsPoint::new(0.0, 0.01),
//! ]);
//! let halfway = interpolator.position_at(0.5);
//! assert!((halfway.coordinate.longitude - 0.005).abs() < 1e-12);
//! assert!((halfway.heading - 90.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};

use crate::geo_utils::bearing;
use crate::track::Track;
use crate::GpsPoint;

/// Marker position and direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct InterpolatedPosition {
    pub coordinate: GpsPoint,
    /// Degrees clockwise from north, [0, 360)
    pub heading: f64,
}

/// Precomputed route geometry answering `position_at` in constant time.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionInterpolator {
    coords: Vec<GpsPoint>,
    /// Heading of segment `i` (from `coords[i]` to `coords[i + 1]`)
    headings: Vec<f64>,
}

impl PositionInterpolator {
    /// Build from route coordinates. An empty input yields an interpolator
    /// with no positions.
    pub fn new(coords: Vec<GpsPoint>) -> Self {
        let mut headings = Vec::with_capacity(coords.len().saturating_sub(1));
        let mut previous = 0.0;
        for w in coords.windows(2) {
            // Repeated samples would report heading 0; hold the last real one
            let heading = if w[0] == w[1] {
                previous
            } else {
                bearing(&w[0], &w[1])
            };
            headings.push(heading);
            previous = heading;
        }
        Self { coords, headings }
    }

    pub fn from_track(track: &Track) -> Self {
        Self::new(track.coordinates())
    }

    /// Number of route points progress is spread over.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Position and heading at `progress` in [0, 1].
    ///
    /// Out-of-range progress is clamped and NaN is treated as 0. A single-point
    /// route returns that point with heading 0; an empty route returns the
    /// origin with heading 0.
    pub fn position_at(&self, progress: f64) -> InterpolatedPosition {
        let n = self.coords.len();
        match n {
            0 => {
                return InterpolatedPosition {
                    coordinate: GpsPoint::new(0.0, 0.0),
                    heading: 0.0,
                }
            }
            1 => {
                return InterpolatedPosition {
                    coordinate: self.coords[0],
                    heading: 0.0,
                }
            }
            _ => {}
        }

        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let index = progress * (n - 1) as f64;
        let segment = (index.floor() as usize).min(n - 2);
        let t = index - segment as f64;

        let a = &self.coords[segment];
        let b = &self.coords[segment + 1];
        InterpolatedPosition {
            coordinate: GpsPoint::new(
                a.latitude + (b.latitude - a.latitude) * t,
                a.longitude + (b.longitude - a.longitude) * t,
            ),
            heading: self.headings[segment],
        }
    }
}

/// Maps wall-clock time to looping replay progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayClock {
    /// Seconds for one full traversal of the route
    pub duration_seconds: f64,
}

impl Default for ReplayClock {
    fn default() -> Self {
        Self {
            duration_seconds: 10.0,
        }
    }
}

impl ReplayClock {
    pub fn new(duration_seconds: f64) -> Self {
        Self { duration_seconds }
    }

    /// Progress in [0, 1) after `elapsed_seconds`, wrapping back to 0 at the end.
    pub fn progress_at(&self, elapsed_seconds: f64) -> f64 {
        if !(self.duration_seconds > 0.0) || !elapsed_seconds.is_finite() {
            return 0.0;
        }
        elapsed_seconds.rem_euclid(self.duration_seconds) / self.duration_seconds
    }
}
