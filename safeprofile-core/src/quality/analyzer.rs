//! Quality analyzer facade.
//!
//! Runs the dictionary and flag passes with one [`QualityConfig`] and
//! bundles the results into a [`QualityReport`].

use chrono::Utc;

use crate::Result;
use crate::models::{Column, Table};

use super::config::QualityConfig;
use super::dictionary::data_dictionary;
use super::flags::quality_flags;
use super::frequency::value_counts;
use super::models::{FrequencyTable, QualityReport};

/// Quality analyzer for a safe table.
///
/// # Example
///
/// ```rust
/// use safeprofile_core::models::{Column, Table};
/// use safeprofile_core::quality::{QualityAnalyzer, QualityConfig};
///
/// let table = Table::new(vec![Column::from_text("ZONA", [Some("a"), Some("a")])]).unwrap();
/// let analyzer = QualityAnalyzer::new(QualityConfig::default());
/// let report = analyzer.analyze(&table).unwrap();
/// assert_eq!(report.flags.constant_like, vec!["ZONA"]);
/// ```
#[derive(Debug, Clone)]
pub struct QualityAnalyzer {
    config: QualityConfig,
}

impl QualityAnalyzer {
    /// Creates a new quality analyzer with the given configuration.
    pub const fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    /// Creates a new quality analyzer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(QualityConfig::default())
    }

    /// Returns a reference to the analyzer configuration.
    pub const fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Profiles a table.
    ///
    /// Fails only when the configuration is invalid.
    pub fn analyze(&self, table: &Table) -> Result<QualityReport> {
        self.config.validate()?;

        let dictionary = data_dictionary(table);
        let flags = quality_flags(
            table,
            self.config.high_card_threshold,
            self.config.const_threshold,
        );

        tracing::info!(
            "Quality flags: {} constant-like, {} high-cardinality, {} candidate ids, {} duplicate rows",
            flags.constant_like.len(),
            flags.high_cardinality.len(),
            flags.candidate_ids.len(),
            flags.duplicate_rows
        );

        Ok(QualityReport {
            row_count: table.row_count(),
            column_count: table.column_count(),
            dictionary,
            flags,
            analyzed_at: Utc::now(),
        })
    }

    /// Top value counts for a column, bounded by the configured `top_n`.
    pub fn top_values(&self, column: &Column) -> FrequencyTable {
        value_counts(column, Some(self.config.top_n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProfileError;
    use crate::models::CellValue;

    fn sample() -> Table {
        Table::new(vec![
            Column::new(
                "EDAD",
                vec![
                    CellValue::Number(30.0),
                    CellValue::Number(30.0),
                    CellValue::Number(41.0),
                ],
            ),
            Column::from_text("ZONA", [Some("rural"), Some("rural"), Some("urbana")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_analyze_report_shape() {
        let report = QualityAnalyzer::with_defaults().analyze(&sample()).unwrap();
        assert_eq!(report.row_count, 3);
        assert_eq!(report.column_count, 2);
        assert_eq!(report.dictionary.len(), 2);
        assert_eq!(report.flags.duplicate_rows, 1);
        assert!(report.flags.candidate_ids.is_empty());
    }

    #[test]
    fn test_analyze_uses_thresholds() {
        let config = QualityConfig::new()
            .with_const_threshold(0.6)
            .with_high_card_threshold(1);
        let report = QualityAnalyzer::new(config).analyze(&sample()).unwrap();
        assert_eq!(report.flags.constant_like, vec!["EDAD", "ZONA"]);
        assert_eq!(report.flags.high_cardinality, vec!["ZONA"]);
    }

    #[test]
    fn test_analyze_rejects_invalid_config() {
        let analyzer = QualityAnalyzer::new(QualityConfig::new().with_top_n(0));
        assert!(matches!(
            analyzer.analyze(&sample()),
            Err(ProfileError::Configuration { .. })
        ));
    }

    #[test]
    fn test_top_values_bounded() {
        let analyzer = QualityAnalyzer::new(QualityConfig::new().with_top_n(1));
        let table = sample();
        let top = analyzer.top_values(table.column("ZONA").unwrap());
        assert_eq!(top.labels(), vec!["rural"]);
    }

    #[test]
    fn test_report_serializes_timestamp() {
        let report = QualityAnalyzer::with_defaults().analyze(&sample()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["analyzed_at"].is_string());
        assert_eq!(json["dictionary"][0]["dtype"], "integer");
    }
}
