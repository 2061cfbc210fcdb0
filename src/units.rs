//! Distance units and display formatting.
//!
//! The algorithms work in meters and seconds throughout; a [`UnitPreference`]
//! is only consulted where results are expressed per kilometer or per mile.

use serde::{Deserialize, Serialize};

/// Meters in one statute mile.
pub const METERS_PER_MILE: f64 = 1609.344;

/// Meters in one kilometer.
pub const METERS_PER_KILOMETER: f64 = 1000.0;

/// Which distance unit splits, paces and chart axes are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum UnitPreference {
    #[default]
    Metric,
    Imperial,
}

impl UnitPreference {
    /// Map the host application's "use metric" switch.
    pub fn from_metric(metric: bool) -> Self {
        if metric {
            UnitPreference::Metric
        } else {
            UnitPreference::Imperial
        }
    }

    /// Length of one split unit in meters.
    pub fn unit_distance_meters(self) -> f64 {
        match self {
            UnitPreference::Metric => METERS_PER_KILOMETER,
            UnitPreference::Imperial => METERS_PER_MILE,
        }
    }

    /// Short label for the unit ("km" / "mi").
    pub fn unit_label(self) -> &'static str {
        match self {
            UnitPreference::Metric => "km",
            UnitPreference::Imperial => "mi",
        }
    }

    /// Convert meters to this unit.
    pub fn meters_to_units(self, meters: f64) -> f64 {
        meters / self.unit_distance_meters()
    }

    /// Convert a seconds-per-meter pace to minutes per unit.
    pub fn pace_minutes_per_unit(self, seconds_per_meter: f64) -> f64 {
        seconds_per_meter * self.unit_distance_meters() / 60.0
    }

    /// Format a pace in minutes per unit as `"M:SS /km"`.
    ///
    /// # Example
    /// ```
    /// use route_analytics::UnitPreference;
    /// assert_eq!(UnitPreference::Metric.format_pace(6.5), "6:30 /km");
    /// assert_eq!(UnitPreference::Imperial.format_pace(9.0), "9:00 /mi");
    /// ```
    pub fn format_pace(self, minutes_per_unit: f64) -> String {
        if !minutes_per_unit.is_finite() || minutes_per_unit <= 0.0 {
            return format!("--:-- /{}", self.unit_label());
        }
        let total_seconds = (minutes_per_unit * 60.0).round() as u64;
        format!(
            "{}:{:02} /{}",
            total_seconds / 60,
            total_seconds % 60,
            self.unit_label()
        )
    }

    /// Format a distance in meters as `"5.80 mi"`.
    pub fn format_distance(self, meters: f64) -> String {
        format!("{:.2} {}", self.meters_to_units(meters), self.unit_label())
    }
}

/// Format a duration in seconds as `"H:MM:SS"` or `"M:SS"`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
