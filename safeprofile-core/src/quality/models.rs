//! Quality profile models.
//!
//! Everything here is computed from the anonymized table and is safe to
//! write out: column names, counts, ratios and summary statistics. Frequency
//! tables do carry values, but only values that survived anonymization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CellValue, ColumnKind};

/// One row of the data dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name
    pub column: String,
    /// Inferred kind
    pub dtype: ColumnKind,
    /// Count of present values
    pub non_null: usize,
    /// Count of missing values
    pub nulls: usize,
    /// Missing share as a percentage, rounded to two decimals
    pub null_pct: f64,
    /// Distinct present values
    pub n_unique: usize,
}

/// Column-level quality flags for a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityFlags {
    /// Columns dominated by a single value
    pub constant_like: Vec<String>,
    /// Text columns with many distinct values
    pub high_cardinality: Vec<String>,
    /// Rows identical to an earlier row
    pub duplicate_rows: usize,
    /// Columns whose values never repeat
    pub candidate_ids: Vec<String>,
}

/// Descriptive statistics for one numeric column.
///
/// Statistics other than `count` are `None` when the column has no present
/// values; `std` is also `None` with a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    /// Column name
    pub column: String,
    /// Count of present values
    pub count: usize,
    /// Arithmetic mean
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1)
    pub std: Option<f64>,
    /// Minimum
    pub min: Option<f64>,
    /// First quartile
    pub p25: Option<f64>,
    /// Median
    pub p50: Option<f64>,
    /// Third quartile
    pub p75: Option<f64>,
    /// Maximum
    pub max: Option<f64>,
}

impl NumericSummary {
    /// Statistic labels in report order.
    pub const STAT_LABELS: [&'static str; 8] =
        ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Statistics in the same order as [`Self::STAT_LABELS`].
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> [Option<f64>; 8] {
        [
            Some(self.count as f64),
            self.mean,
            self.std,
            self.min,
            self.p25,
            self.p50,
            self.p75,
            self.max,
        ]
    }
}

/// Pairwise Pearson correlations between numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Column names, indexing both axes
    pub columns: Vec<String>,
    /// Row-major coefficients; `None` where undefined
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Coefficient between columns `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied().flatten()
    }
}

/// A value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    /// The value; `Null` for missing cells
    pub value: CellValue,
    /// Occurrences
    pub count: usize,
}

/// Value counts for one column, most frequent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    /// Column name
    pub column: String,
    /// Entries sorted by count descending, ties in first-seen order
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display labels, missing values shown as `NaN`.
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.value.to_string()).collect()
    }

    /// Counts in entry order.
    pub fn counts(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.count).collect()
    }
}

/// Dictionary and flags for one table, stamped with the analysis time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Rows analyzed
    pub row_count: usize,
    /// Columns analyzed
    pub column_count: usize,
    /// One profile per column, in table order
    pub dictionary: Vec<ColumnProfile>,
    /// Column-level flags
    pub flags: QualityFlags,
    /// When the analysis ran
    pub analyzed_at: DateTime<Utc>,
}
