//! Core library for SafeProfile.
//!
//! SafeProfile turns a CSV or Excel file that may contain personal data into
//! a privacy-safe copy plus a data-quality profile: a data dictionary,
//! quality flags, numeric summaries, frequency tables, thematic column
//! groups, cross-tabulations and charts.
//!
//! # Privacy Guarantees
//! - Identity columns are removed before any profiling stage runs
//! - Operator columns are replaced by salted, truncated SHA-256 digests
//! - Free-text columns are scrubbed of e-mail addresses and phone numbers
//! - Logs and errors carry column names and counts, never cell values
//!
//! # Architecture
//! Each stage is a pure transformation over an in-memory [`Table`]:
//! [`loader`] reads the file, [`text`] canonicalizes headers and text,
//! [`pii`] classifies and anonymizes, [`quality`] profiles the safe table,
//! and [`report`] plus [`charts`] write the artifacts. [`Pipeline`] runs the
//! stages in order.

pub mod charts;
pub mod config;
pub mod crosstab;
pub mod error;
pub mod grouping;
pub mod loader;
pub mod logging;
pub mod models;
pub mod pii;
pub mod pipeline;
pub mod quality;
pub mod report;
pub mod text;

// Re-export commonly used types
pub use charts::{ChartRenderer, PlotKind, PlotRequest, PngChartRenderer};
pub use config::RunConfig;
pub use crosstab::{CrossTab, PairCount, cross_tabulate};
pub use error::{ProfileError, Result};
pub use grouping::{ColumnGroup, GroupMap, auto_group_columns};
pub use loader::{DelimiterMode, SheetSelector, load_table};
pub use logging::init_logging;
pub use models::{CellValue, Column, ColumnKind, Table};
pub use pii::{AnonymizerConfig, Anonymizer, PiiClassifier, PiiConfig, anonymize, classify};
pub use pipeline::{Pipeline, RunSummary};
pub use quality::{QualityAnalyzer, QualityConfig, QualityReport};
pub use text::{normalize, normalize_columns, redact_contact_info, safe_filename};
