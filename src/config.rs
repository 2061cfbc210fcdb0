//! Aggregated analysis configuration.
//!
//! Every threshold the pipeline uses lives in one of the component configs;
//! [`AnalysisConfig`] bundles them so a host can ship a single JSON document
//! with partial overrides.
//!
//! ## Example
//! ```rust
//! use route_analytics::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_json(r#"{"filter": {"target_points": 120}}"#).unwrap();
//! assert_eq!(config.filter.target_points, 120);
//! assert_eq!(config.splits.jump_threshold_m, 100.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::DEFAULT_GRADE_WINDOW_M;
use crate::error::{AnalysisError, Result};
use crate::filter::FilterConfig;
use crate::metadata::ActivityType;
use crate::pace_curve::PaceCurveConfig;
use crate::region::RegionConfig;
use crate::splits::SplitConfig;

/// Configuration for a whole analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub filter: FilterConfig,
    pub splits: SplitConfig,
    pub pace_curve: PaceCurveConfig,
    pub region: RegionConfig,

    /// Horizontal window for steepest grade detection.
    /// Default: 50.0 meters
    pub grade_window_m: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            splits: SplitConfig::default(),
            pace_curve: PaceCurveConfig::default(),
            region: RegionConfig::default(),
            grade_window_m: DEFAULT_GRADE_WINDOW_M,
        }
    }
}

impl AnalysisConfig {
    /// Defaults with split thresholds tuned for `activity`.
    pub fn for_activity(activity: ActivityType) -> Self {
        Self {
            splits: SplitConfig::for_activity(activity),
            ..Self::default()
        }
    }

    /// Parse a JSON document. Missing fields keep their defaults.
    ///
    /// Fails with [`AnalysisError::ConfigError`] on malformed JSON or on a
    /// configuration [`validate`](Self::validate) rejects.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the pace bands and numeric thresholds for inverted or non-finite values.
    pub fn validate(&self) -> Result<()> {
        self.splits.validate()?;
        self.pace_curve.validate()?;
        if !(self.grade_window_m > 0.0) || !self.grade_window_m.is_finite() {
            return Err(AnalysisError::ConfigError {
                message: format!("grade_window_m {} must be positive", self.grade_window_m),
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
