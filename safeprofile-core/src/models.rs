//! Tabular data model shared by every pipeline stage.
//!
//! A [`Table`] is an ordered list of uniquely named [`Column`]s of equal
//! length. Stages receive tables by shared reference and build new tables
//! instead of mutating the ones they are given.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, error::ProfileError};

/// A single cell value.
///
/// Numbers are kept as `f64` (finite only); text is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Numeric cell
    Number(f64),
    /// Text cell
    Text(String),
    /// Missing value
    Null,
}

// Manual Eq/Hash so cells can be counted in hash maps. Loader only admits
// finite numbers, so bit equality matches numeric equality except for -0.0.
impl Eq for CellValue {}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Number(n) => {
                let n = if *n == 0.0 { 0.0_f64 } else { *n };
                n.to_bits().hash(state);
            }
            Self::Text(s) => s.hash(state),
            Self::Null => {}
        }
    }
}

impl CellValue {
    /// Returns true for missing values.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the cell, if it holds a number.
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text content for hashing and scrubbing; `None` for missing values.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Number(n) => Some(format_number(*n)),
            Self::Text(s) => Some(s.clone()),
            Self::Null => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::Text(s) => write!(f, "{s}"),
            Self::Null => write!(f, "NaN"),
        }
    }
}

/// Formats a number the way it reads in a spreadsheet: integral values
/// without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

/// Inferred storage category of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Every non-null value is an integral number
    Integer,
    /// Every non-null value is a number, at least one fractional
    Float,
    /// Anything else, including all-null columns
    Text,
}

impl ColumnKind {
    /// True for integer and float columns.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Name used in the data dictionary.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named column of cells with a uniform kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    values: Vec<CellValue>,
}

impl Column {
    /// Builds a column, inferring its kind.
    ///
    /// A column whose non-null cells mix numbers and text is coerced to
    /// text, numbers rendered with [`format_number`].
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let has_text = values.iter().any(|v| matches!(v, CellValue::Text(_)));
        let has_number = values.iter().any(|v| matches!(v, CellValue::Number(_)));

        let (kind, values) = if has_text || !has_number {
            let values = values
                .into_iter()
                .map(|v| match v {
                    CellValue::Number(n) => CellValue::Text(format_number(n)),
                    other => other,
                })
                .collect();
            (ColumnKind::Text, values)
        } else {
            let integral = values
                .iter()
                .filter_map(CellValue::as_f64)
                .all(|n| n.fract() == 0.0);
            let kind = if integral {
                ColumnKind::Integer
            } else {
                ColumnKind::Float
            };
            (kind, values)
        };

        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Builds a text column from optional strings.
    pub fn from_text<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|v| v.map_or(CellValue::Null, |s| CellValue::Text(s.into())))
            .collect();
        Self {
            name: name.into(),
            kind: ColumnKind::Text,
            values,
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inferred kind.
    pub const fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// Cell values in row order.
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Returns a copy with a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: self.kind,
            values: self.values.clone(),
        }
    }

    /// Returns a copy with every value mapped through `f`, as text.
    ///
    /// Missing values are handed to `f` as `None`, so callers decide
    /// whether they stay missing.
    pub fn map_text<F>(&self, mut f: F) -> Self
    where
        F: FnMut(Option<&str>) -> Option<String>,
    {
        let values = self
            .values
            .iter()
            .map(|v| {
                let text = v.as_text();
                f(text.as_deref()).map_or(CellValue::Null, CellValue::Text)
            })
            .collect();
        Self {
            name: self.name.clone(),
            kind: ColumnKind::Text,
            values,
        }
    }
}

/// An ordered set of uniquely named, equal-length columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Builds a table, enforcing unique names and equal column lengths.
    ///
    /// The row count is taken from the first column; a table without
    /// columns has no rows. Use [`Table::with_row_count`] to keep the row
    /// count of a table whose columns were all removed.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, Column::len);
        Self::with_row_count(columns, rows)
    }

    /// Builds a table with an explicit row count.
    ///
    /// Every column must hold exactly `rows` values.
    pub fn with_row_count(columns: Vec<Column>, rows: usize) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(ProfileError::configuration(format!(
                    "Duplicate column name '{}'",
                    column.name()
                )));
            }
        }

        if let Some(ragged) = columns.iter().find(|c| c.len() != rows) {
            return Err(ProfileError::configuration(format!(
                "Column '{}' has {} rows, expected {}",
                ragged.name(),
                ragged.len(),
                rows
            )));
        }

        Ok(Self { columns, rows })
    }

    /// Columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// True when a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Number of rows.
    pub const fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Numeric columns in order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.kind().is_numeric())
    }

    /// Non-numeric columns in order.
    pub fn categorical_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.kind().is_numeric())
    }

    /// Cells of one row across all columns.
    pub fn row(&self, index: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.values()[index]).collect()
    }
}
