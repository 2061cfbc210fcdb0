//! Unified error handling for the route-analytics library.
//!
//! Almost every "no data" condition in this crate resolves to an empty collection
//! or a neutral default. The few operations with a hard precondition (an empty
//! track, an unreadable configuration) report it through [`AnalysisError`].

use std::fmt;

/// Unified error type for route-analytics operations.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// No valid points remain (empty input, or every point was out of range)
    EmptyTrack,
    /// Workout metadata text could not be interpreted
    MetadataParse { field: &'static str, value: String },
    /// Configuration error
    ConfigError { message: String },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::EmptyTrack => write!(f, "Track has no valid points"),
            AnalysisError::MetadataParse { field, value } => {
                write!(f, "Could not parse {} from '{}'", field, value)
            }
            AnalysisError::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::ConfigError {
            message: err.to_string(),
        }
    }
}

/// Result type alias for route-analytics operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for converting Option to AnalysisError.
pub trait OptionExt<T> {
    /// Convert Option to Result with an empty track error.
    fn ok_or_empty_track(self) -> Result<T>;

    /// Convert Option to Result with a metadata parse error.
    fn ok_or_metadata(self, field: &'static str, value: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_empty_track(self) -> Result<T> {
        self.ok_or(AnalysisError::EmptyTrack)
    }

    fn ok_or_metadata(self, field: &'static str, value: &str) -> Result<T> {
        self.ok_or_else(|| AnalysisError::MetadataParse {
            field,
            value: value.to_string(),
        })
    }
}
