//! Workout-level metadata reported alongside the samples.
//!
//! The record source reports totals as display text ("5.8 mi", "45:00",
//! "9:00/mi"). Those values back the split fallbacks when per-sample timing
//! cannot be trusted, so they are parsed leniently: anything unreadable is
//! treated as absent.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, OptionExt, Result};
use crate::units::{METERS_PER_KILOMETER, METERS_PER_MILE};

/// Kind of workout the samples were recorded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum ActivityType {
    #[default]
    Run,
    Walk,
    Hike,
    Bike,
}

/// Totals and averages reported by the workout record source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct WorkoutMetadata {
    #[serde(default)]
    pub activity_type: ActivityType,
    /// e.g. "5.8 mi", "9.3 km" or a bare number in miles
    pub reported_distance_text: Option<String>,
    /// "HH:MM:SS" or "MM:SS"
    pub reported_duration_text: Option<String>,
    /// "M:SS/mi", "M:SS/km" or a bare number of minutes per mile
    pub reported_avg_pace_text: Option<String>,
    pub avg_heart_rate: Option<f64>,
    pub avg_cadence: Option<f64>,
}

impl WorkoutMetadata {
    /// Reported total distance in meters.
    pub fn distance_meters(&self) -> Option<f64> {
        lenient(&self.reported_distance_text, parse_distance_meters)
            .filter(|d| *d > 0.0)
    }

    /// Reported duration in seconds.
    pub fn duration_seconds(&self) -> Option<f64> {
        lenient(&self.reported_duration_text, parse_duration_seconds)
    }

    /// Reported average pace in seconds per meter.
    pub fn pace_seconds_per_meter(&self) -> Option<f64> {
        lenient(&self.reported_avg_pace_text, parse_pace_seconds_per_meter)
            .filter(|p| *p > 0.0)
    }

    /// Best available estimate of seconds per meter: the reported pace, then
    /// reported duration over reported distance.
    pub fn estimated_seconds_per_meter(&self) -> Option<f64> {
        self.pace_seconds_per_meter().or_else(|| {
            match (self.duration_seconds(), self.distance_meters()) {
                (Some(duration), Some(distance)) if duration > 0.0 => Some(duration / distance),
                _ => None,
            }
        })
    }
}

fn lenient(text: &Option<String>, parse: fn(&str) -> Result<f64>) -> Option<f64> {
    let text = text.as_deref()?;
    match parse(text) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("[Metadata] Ignoring unparseable value: {}", err);
            None
        }
    }
}

/// Parse a distance such as `"5.8 mi"`, `"9.3 km"`, `"800 m"` or `"5.8"` (miles).
pub fn parse_distance_meters(text: &str) -> Result<f64> {
    let trimmed = text.trim().to_ascii_lowercase();
    let split_at = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split_at);

    let value: f64 = number
        .trim()
        .replace(',', "")
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite() && *v >= 0.0)
        .ok_or_metadata("distance", text)?;

    let meters_per_unit = match unit.trim() {
        "" | "mi" | "mile" | "miles" => METERS_PER_MILE,
        "km" | "kms" | "kilometer" | "kilometers" => METERS_PER_KILOMETER,
        "m" | "meter" | "meters" => 1.0,
        _ => None::<f64>.ok_or_metadata("distance", text)?,
    };
    Ok(value * meters_per_unit)
}

/// Parse `"HH:MM:SS"` or `"MM:SS"` into seconds.
pub fn parse_duration_seconds(text: &str) -> Result<f64> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    let numbers: Option<Vec<f64>> = parts
        .iter()
        .map(|p| p.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0))
        .collect();
    let numbers = numbers.ok_or_metadata("duration", text)?;

    match numbers.as_slice() {
        [h, m, s] => Ok(h * 3600.0 + m * 60.0 + s),
        [m, s] => Ok(m * 60.0 + s),
        _ => None::<f64>.ok_or_metadata("duration", text),
    }
}

/// Parse `"M:SS/mi"`, `"M:SS/km"`, `"M:SS"` or a bare number of minutes into
/// seconds per meter. Paces without a unit are taken as per mile.
pub fn parse_pace_seconds_per_meter(text: &str) -> Result<f64> {
    let lower = text.trim().to_ascii_lowercase();
    let (value, unit) = match lower.split_once('/') {
        Some((value, unit)) => (value.trim(), unit.trim()),
        None => (lower.as_str(), ""),
    };

    let meters = match unit {
        "" | "mi" | "mile" => METERS_PER_MILE,
        "km" => METERS_PER_KILOMETER,
        _ => None::<f64>.ok_or_metadata("pace", text)?,
    };

    let seconds = if value.contains(':') {
        parse_duration_seconds(value).map_err(|_| AnalysisError::MetadataParse {
            field: "pace",
            value: text.to_string(),
        })?
    } else {
        let minutes: f64 = value
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite() && *v > 0.0)
            .ok_or_metadata("pace", text)?;
        minutes * 60.0
    };

    Ok(seconds / meters)
}
