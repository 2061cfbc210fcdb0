//! Map viewport framing a whole route.
//!
//! The viewport is the route's bounding box, padded on both axes, widened to a
//! minimum span so near-stationary tracks still show some map, and optionally
//! stretched to match the aspect ratio of the map view.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geo_utils::compute_bounds;
use crate::{Bounds, GpsPoint};

/// Padding used by the compact route thumbnail.
pub const COMPACT_PADDING: f64 = 0.15;

/// Padding used by the full-screen route map.
pub const SPACIOUS_PADDING: f64 = 0.30;

/// Parameters for [`compute_region`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct RegionConfig {
    /// Fraction of the route's span added to each axis.
    /// Default: 0.15
    pub padding_factor: f64,

    /// Smallest span on either axis, in degrees.
    /// Default: 0.005
    pub min_span_degrees: f64,

    /// Width / height of the map view. When set, one axis is widened so the
    /// route keeps its true proportions on screen.
    /// Default: None
    pub viewport_aspect: Option<f64>,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            padding_factor: COMPACT_PADDING,
            min_span_degrees: 0.005,
            viewport_aspect: None,
        }
    }
}

impl RegionConfig {
    /// Defaults with the more generous full-screen padding.
    pub fn spacious() -> Self {
        Self {
            padding_factor: SPACIOUS_PADDING,
            ..Self::default()
        }
    }
}

/// Center and span of a map viewport, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct MapRegion {
    pub center: GpsPoint,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapRegion {
    /// Bounding box covered by the viewport.
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_lat: self.center.latitude - self.latitude_delta / 2.0,
            max_lat: self.center.latitude + self.latitude_delta / 2.0,
            min_lng: self.center.longitude - self.longitude_delta / 2.0,
            max_lng: self.center.longitude + self.longitude_delta / 2.0,
        }
    }
}

/// Compute a padded viewport framing `points`.
///
/// Fails only for an empty slice.
///
/// # Example
/// ```
/// use route_analytics::{compute_region, GpsPoint, RegionConfig};
///
/// let route = vec![GpsPoint::new(51.50, -0.13), GpsPoint::new(51.52, -0.10)];
/// let region = compute_region(&route, &RegionConfig::default()).unwrap();
/// assert!((region.center.latitude - 51.51).abs() < 1e-9);
/// assert!(region.latitude_delta > 0.02);
/// ```
pub fn compute_region(points: &[GpsPoint], config: &RegionConfig) -> Result<MapRegion> {
    let bounds = compute_bounds(points)?;
    let center = bounds.center();

    let padding = 1.0 + config.padding_factor.max(0.0);
    let min_span = config.min_span_degrees.max(0.0);
    let mut latitude_delta = ((bounds.max_lat - bounds.min_lat) * padding).max(min_span);
    let mut longitude_delta = ((bounds.max_lng - bounds.min_lng) * padding).max(min_span);

    if let Some(aspect) = config.viewport_aspect.filter(|a| a.is_finite() && *a > 0.0) {
        // Longitude degrees shrink towards the poles
        let lng_scale = center.latitude.to_radians().cos().max(0.01);
        let width = longitude_delta * lng_scale;
        if width / latitude_delta < aspect {
            longitude_delta = aspect * latitude_delta / lng_scale;
        } else {
            latitude_delta = width / aspect;
        }
    }

    Ok(MapRegion {
        center,
        latitude_delta: latitude_delta.min(180.0),
        longitude_delta: longitude_delta.min(360.0),
    })
}
