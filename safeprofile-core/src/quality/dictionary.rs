//! Per-column data dictionary.

use std::collections::HashSet;

use crate::models::{CellValue, Column, Table};

use super::models::ColumnProfile;

/// Profiles every column of a table, in table order.
pub fn data_dictionary(table: &Table) -> Vec<ColumnProfile> {
    table.columns().iter().map(profile_column).collect()
}

#[allow(clippy::cast_precision_loss)]
fn profile_column(column: &Column) -> ColumnProfile {
    let nulls = column.null_count();
    let non_null = column.len() - nulls;
    let null_pct = if column.is_empty() {
        0.0
    } else {
        round2(nulls as f64 / column.len() as f64 * 100.0)
    };

    ColumnProfile {
        column: column.name().to_string(),
        dtype: column.kind(),
        non_null,
        nulls,
        null_pct,
        n_unique: distinct_non_null(column),
    }
}

/// Number of distinct present values.
pub(crate) fn distinct_non_null(column: &Column) -> usize {
    column
        .values()
        .iter()
        .filter(|v| !v.is_null())
        .collect::<HashSet<&CellValue>>()
        .len()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
