//! Run configuration.
//!
//! One [`RunConfig`] describes a whole pipeline run: where the input lives,
//! how to read it, where artifacts go and which thresholds apply. The binary
//! builds it from command-line arguments.

use std::path::{Path, PathBuf};

use crate::Result;
use crate::error::ProfileError;
use crate::loader::{DelimiterMode, SheetSelector};
use crate::pii::AnonymizerConfig;
use crate::quality::QualityConfig;

/// Default report directory.
pub const DEFAULT_OUTDIR: &str = "reports_auto";
/// Default directory for the safe dataset.
pub const DEFAULT_INTERIM_DIR: &str = "data/interim";

/// Settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Spreadsheet or delimited text to profile
    pub input: PathBuf,
    /// Field delimiter for text inputs
    pub delimiter: DelimiterMode,
    /// Worksheet for spreadsheet inputs; first sheet when `None`
    pub sheet: Option<SheetSelector>,
    /// Report directory
    pub outdir: PathBuf,
    /// Directory receiving `sample_head.csv`
    pub interim_dir: PathBuf,
    /// Thresholds and top-N
    pub quality: QualityConfig,
    /// Hashing salt and digest length
    pub anonymizer: AnonymizerConfig,
    /// Column names to cross-tabulate in adjacent pairs
    pub cross: Vec<String>,
}

impl RunConfig {
    /// Creates a configuration with defaults for everything but the input.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            delimiter: DelimiterMode::Auto,
            sheet: None,
            outdir: PathBuf::from(DEFAULT_OUTDIR),
            interim_dir: PathBuf::from(DEFAULT_INTERIM_DIR),
            quality: QualityConfig::default(),
            anonymizer: AnonymizerConfig::default(),
            cross: Vec::new(),
        }
    }

    /// Builder method to set the delimiter mode.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: DelimiterMode) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder method to select a worksheet.
    #[must_use]
    pub fn with_sheet(mut self, sheet: Option<SheetSelector>) -> Self {
        self.sheet = sheet;
        self
    }

    /// Builder method to set the report directory.
    #[must_use]
    pub fn with_outdir(mut self, outdir: impl Into<PathBuf>) -> Self {
        self.outdir = outdir.into();
        self
    }

    /// Builder method to set the safe dataset directory.
    #[must_use]
    pub fn with_interim_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.interim_dir = dir.into();
        self
    }

    /// Builder method to set quality thresholds.
    #[must_use]
    pub fn with_quality(mut self, quality: QualityConfig) -> Self {
        self.quality = quality;
        self
    }

    /// Builder method to set hashing parameters.
    #[must_use]
    pub fn with_anonymizer(mut self, anonymizer: AnonymizerConfig) -> Self {
        self.anonymizer = anonymizer;
        self
    }

    /// Builder method to set cross-tabulation columns.
    #[must_use]
    pub fn with_cross(mut self, cross: Vec<String>) -> Self {
        self.cross = cross;
        self
    }

    /// Figures directory under the report directory.
    pub fn figures_dir(&self) -> PathBuf {
        self.outdir.join("figures")
    }

    /// Path of the safe dataset.
    pub fn safe_dataset_path(&self) -> PathBuf {
        self.interim_dir.join("sample_head.csv")
    }

    /// Validates thresholds and paths.
    pub fn validate(&self) -> Result<()> {
        self.quality.validate()?;

        if self.anonymizer.salt.is_empty() {
            return Err(ProfileError::configuration("salt must not be empty"));
        }
        if !(1..=64).contains(&self.anonymizer.prefix_len) {
            return Err(ProfileError::configuration(format!(
                "hash prefix length must be between 1 and 64, got {}",
                self.anonymizer.prefix_len
            )));
        }
        if is_blank(&self.outdir) {
            return Err(ProfileError::configuration("outdir must not be empty"));
        }
        if is_blank(&self.interim_dir) {
            return Err(ProfileError::configuration("interim dir must not be empty"));
        }
        Ok(())
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::new("base.xlsx");
        assert_eq!(config.outdir, PathBuf::from("reports_auto"));
        assert_eq!(config.safe_dataset_path(), PathBuf::from("data/interim/sample_head.csv"));
        assert_eq!(config.figures_dir(), PathBuf::from("reports_auto/figures"));
        assert_eq!(config.delimiter, DelimiterMode::Auto);
        assert!(config.cross.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let config = RunConfig::new("base.csv")
            .with_quality(QualityConfig::new().with_const_threshold(1.5));
        assert!(matches!(
            config.validate(),
            Err(ProfileError::Configuration { .. })
        ));
    }

    #[test]
    fn test_empty_salt_rejected() {
        let config = RunConfig::new("base.csv").with_anonymizer(AnonymizerConfig::with_salt(""));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_outdir_rejected() {
        let config = RunConfig::new("base.csv").with_outdir("");
        assert!(config.validate().is_err());
    }
}
