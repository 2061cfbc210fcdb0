//! # Route Analytics
//!
//! Display-ready analytics for recorded endurance workouts (run, walk, hike, bike).
//!
//! This library provides:
//! - Downsampling of raw GPS samples for map rendering
//! - Kilometer/mile splits that degrade gracefully when timestamps are unreliable
//! - A binned pace-vs-distance curve, elevation and heart-rate series
//! - Progress-to-position interpolation for animated route replay
//! - Padded, aspect-correct map viewports
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel batch analysis with rayon
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use route_analytics::{
//!     compute_region, compute_splits, downsample, FilterConfig, PositionInterpolator,
//!     RegionConfig, SplitConfig, Track, TrackPoint, UnitPreference, WorkoutMetadata,
//! };
//!
//! // 1.5 km due north at 5:00 /km
//! let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
//! let points: Vec<TrackPoint> = (0..=300)
//!     .map(|i| TrackPoint::new(51.5 + i as f64 * 0.0000449661, -0.12, start + Duration::milliseconds(i * 1500)))
//!     .collect();
//! let track = Track::new(points).unwrap();
//!
//! let splits = compute_splits(&track, &WorkoutMetadata::default(), UnitPreference::Metric, &SplitConfig::default());
//! assert_eq!(splits.len(), 2);
//!
//! let display = downsample(&track, &FilterConfig::default());
//! let region = compute_region(&display.coordinates(), &RegionConfig::default()).unwrap();
//! assert!(region.latitude_delta > 0.0135);
//!
//! let marker = PositionInterpolator::from_track(&display).position_at(0.5);
//! println!("Marker at {:?}, heading {:.0}", marker.coordinate, marker.heading);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{AnalysisError, OptionExt, Result};

// Geographic utilities (distance, bearing, bounds)
pub mod geo_utils;
pub use geo_utils::compute_bounds;

// Units and display formatting
pub mod units;
pub use units::{format_duration, UnitPreference, METERS_PER_KILOMETER, METERS_PER_MILE};

// Samples and validated tracks
pub mod track;
pub use track::{Track, TrackPoint};

// Reported workout totals
pub mod metadata;
pub use metadata::{ActivityType, WorkoutMetadata};

// Track downsampling
pub mod filter;
pub use filter::{downsample, downsample_points, FilterConfig};

// Kilometer/mile splits
pub mod splits;
pub use splits::{compute_splits, Split, SplitConfig};

// Pace-vs-distance curve
pub mod pace_curve;
pub use pace_curve::{build_pace_curve, PaceCurveConfig, PacePoint};

// Route replay
pub mod interpolate;
pub use interpolate::{InterpolatedPosition, PositionInterpolator, ReplayClock};

// Map viewport
pub mod region;
pub use region::{compute_region, MapRegion, RegionConfig, COMPACT_PADDING, SPACIOUS_PADDING};

// Route descriptors and chart series
pub mod analysis;
pub use analysis::{RouteAnalysis, SeriesPoint};

// Outdoor and indoor workout records
pub mod workout;
pub use workout::{TrackSource, TreadmillSample, TreadmillSeries, WorkoutKind};

// Aggregated configuration
pub mod config;
pub use config::AnalysisConfig;

// Per-workout cached analysis
pub mod session;
pub use session::{analyze_batch, AnalysisSession, WorkoutAnalysis};
#[cfg(feature = "parallel")]
pub use session::analyze_batch_parallel;

// FFI bindings for mobile platforms (iOS/Android)
#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
pub(crate) fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("RouteAnalyticsRust"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
pub(crate) fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use route_analytics::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Bounding box for a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Get the center point of the bounds.
    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}
