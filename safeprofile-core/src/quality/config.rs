//! Quality profiling configuration.
//!
//! Thresholds that decide which columns get flagged, and how many rows each
//! frequency table keeps.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default distinct-value count above which a text column is flagged.
pub const DEFAULT_HIGH_CARD_THRESHOLD: usize = 50;
/// Default top-value share at or above which a column is constant-like.
pub const DEFAULT_CONST_THRESHOLD: f64 = 0.99;
/// Default number of rows kept in frequency tables and bar charts.
pub const DEFAULT_TOP_N: usize = 30;

/// Quality profiling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Text columns with more distinct non-null values are high-cardinality
    pub high_card_threshold: usize,
    /// Top non-null value share that makes a column constant-like (0.0-1.0]
    pub const_threshold: f64,
    /// Rows kept in frequency tables and charts
    pub top_n: usize,
}

/// Validation errors for quality configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("const_threshold must be in (0.0, 1.0], got {0}")]
    InvalidConstThreshold(f64),
    #[error("top_n must be greater than zero")]
    InvalidTopN,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            high_card_threshold: DEFAULT_HIGH_CARD_THRESHOLD,
            const_threshold: DEFAULT_CONST_THRESHOLD,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl QualityConfig {
    /// Creates a new quality config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the high-cardinality threshold.
    pub const fn with_high_card_threshold(mut self, threshold: usize) -> Self {
        self.high_card_threshold = threshold;
        self
    }

    /// Builder method to set the constant-like threshold.
    ///
    /// Out-of-range values are kept as given and rejected by
    /// [`validate`](Self::validate).
    pub const fn with_const_threshold(mut self, threshold: f64) -> Self {
        self.const_threshold = threshold;
        self
    }

    /// Builder method to set the frequency table size.
    pub const fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.const_threshold > 0.0 && self.const_threshold <= 1.0) {
            return Err(ConfigValidationError::InvalidConstThreshold(
                self.const_threshold,
            ));
        }
        if self.top_n == 0 {
            return Err(ConfigValidationError::InvalidTopN);
        }
        Ok(())
    }
}

impl From<ConfigValidationError> for crate::error::ProfileError {
    fn from(err: ConfigValidationError) -> Self {
        Self::configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_config_default() {
        let config = QualityConfig::default();
        assert_eq!(config.high_card_threshold, 50);
        assert!((config.const_threshold - 0.99).abs() < f64::EPSILON);
        assert_eq!(config.top_n, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_quality_config_builder() {
        let config = QualityConfig::new()
            .with_high_card_threshold(10)
            .with_const_threshold(0.8)
            .with_top_n(5);

        assert_eq!(config.high_card_threshold, 10);
        assert!((config.const_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.top_n, 5);
    }

    #[test]
    fn test_validate_const_threshold_bounds() {
        for bad in [0.0, -0.1, 1.01, f64::NAN] {
            let config = QualityConfig::new().with_const_threshold(bad);
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigValidationError::InvalidConstThreshold(_))
                ),
                "accepted {bad}"
            );
        }
        assert!(QualityConfig::new().with_const_threshold(1.0).validate().is_ok());
    }

    #[test]
    fn test_validate_top_n() {
        let config = QualityConfig::new().with_top_n(0);
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTopN));
    }

    #[test]
    fn test_validation_error_converts_to_configuration() {
        let err: crate::error::ProfileError = ConfigValidationError::InvalidTopN.into();
        assert!(err.to_string().contains("top_n"));
    }

    #[test]
    fn test_quality_config_serde_roundtrip() {
        let config = QualityConfig::new().with_const_threshold(0.75).with_top_n(12);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: QualityConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
