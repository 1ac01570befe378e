//! Data quality profiling.
//!
//! This module profiles the anonymized table:
//! - **Dictionary**: per-column kind, null counts and distinct values
//! - **Flags**: constant-like, high-cardinality and candidate-key columns,
//!   plus duplicate rows
//! - **Summaries**: numeric descriptive statistics and correlations
//! - **Frequencies**: value counts and missingness shares
//!
//! # Example
//! ```rust
//! use safeprofile_core::models::{Column, Table};
//! use safeprofile_core::quality::{data_dictionary, quality_flags};
//!
//! let table = Table::new(vec![Column::from_text("ID", [Some("1"), Some("2")])]).unwrap();
//! assert_eq!(data_dictionary(&table)[0].n_unique, 2);
//! assert_eq!(quality_flags(&table, 50, 0.99).candidate_ids, vec!["ID"]);
//! ```

mod analyzer;
mod config;
mod dictionary;
mod flags;
mod frequency;
mod models;
mod summary;

// Re-export public API
pub use analyzer::QualityAnalyzer;
pub use config::{
    ConfigValidationError, DEFAULT_CONST_THRESHOLD, DEFAULT_HIGH_CARD_THRESHOLD, DEFAULT_TOP_N,
    QualityConfig,
};
pub use dictionary::data_dictionary;
pub use flags::{count_duplicate_rows, quality_flags};
pub use frequency::{missing_share, value_counts};
pub use models::{
    ColumnProfile, CorrelationMatrix, FrequencyEntry, FrequencyTable, NumericSummary,
    QualityFlags, QualityReport,
};
pub use summary::{correlation_matrix, numeric_summary};
