//! Column-level quality flags.
//!
//! Constant-like and high-cardinality detection look at present values only.
//! Duplicate-row and candidate-key detection treat missing values as equal
//! to each other.

use std::collections::{HashMap, HashSet};

use crate::models::{CellValue, Column, ColumnKind, Table};

use super::dictionary::distinct_non_null;
use super::models::QualityFlags;

/// Computes the quality flags of a table.
pub fn quality_flags(table: &Table, high_card_threshold: usize, const_threshold: f64) -> QualityFlags {
    let constant_like = table
        .columns()
        .iter()
        .filter(|c| is_constant_like(c, const_threshold))
        .map(|c| c.name().to_string())
        .collect();

    let high_cardinality = table
        .columns()
        .iter()
        .filter(|c| c.kind() == ColumnKind::Text && distinct_non_null(c) > high_card_threshold)
        .map(|c| c.name().to_string())
        .collect();

    let candidate_ids = table
        .columns()
        .iter()
        .filter(|c| is_unique(c))
        .map(|c| c.name().to_string())
        .collect();

    QualityFlags {
        constant_like,
        high_cardinality,
        duplicate_rows: count_duplicate_rows(table),
        candidate_ids,
    }
}

/// True when the most frequent present value reaches `threshold` of all
/// present values. Columns without present values are never flagged.
#[allow(clippy::cast_precision_loss)]
fn is_constant_like(column: &Column, threshold: f64) -> bool {
    let mut counts: HashMap<&CellValue, usize> = HashMap::new();
    let mut present = 0_usize;
    for value in column.values().iter().filter(|v| !v.is_null()) {
        *counts.entry(value).or_insert(0) += 1;
        present += 1;
    }

    let Some(top) = counts.values().copied().max() else {
        return false;
    };
    top as f64 / present as f64 >= threshold
}

/// True when no value, missing included, occurs twice.
fn is_unique(column: &Column) -> bool {
    let mut seen = HashSet::with_capacity(column.len());
    column.values().iter().all(|v| seen.insert(v))
}

/// Counts rows identical to an earlier row.
pub fn count_duplicate_rows(table: &Table) -> usize {
    let mut seen: HashSet<Vec<&CellValue>> = HashSet::with_capacity(table.row_count());
    (0..table.row_count())
        .filter(|&i| !seen.insert(table.row(i)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(name: &str, values: &[Option<&str>]) -> Column {
        Column::from_text(name, values.iter().copied())
    }

    #[test]
    fn test_constant_like_threshold_boundary() {
        let table = Table::new(vec![text(
            "PAIS",
            &[Some("A"), Some("A"), Some("A"), Some("A"), Some("B")],
        )])
        .unwrap();

        assert_eq!(quality_flags(&table, 50, 0.8).constant_like, vec!["PAIS"]);
        assert!(quality_flags(&table, 50, 0.81).constant_like.is_empty());
    }

    #[test]
    fn test_constant_like_ignores_nulls() {
        let table = Table::new(vec![text("PAIS", &[Some("CO"), None, None, None])]).unwrap();
        assert_eq!(quality_flags(&table, 50, 0.99).constant_like, vec!["PAIS"]);
    }

    #[test]
    fn test_all_null_column_not_constant() {
        let table = Table::new(vec![text("VACIA", &[None, None])]).unwrap();
        assert!(quality_flags(&table, 50, 0.5).constant_like.is_empty());
    }

    #[test]
    fn test_high_cardinality_text_only() {
        let ids: Vec<Option<String>> = (0..5).map(|i| Some(format!("id{i}"))).collect();
        let table = Table::new(vec![
            Column::from_text("CODIGO", ids),
            Column::new(
                "VALOR",
                (0..5).map(|i| CellValue::Number(f64::from(i))).collect(),
            ),
        ])
        .unwrap();

        let flags = quality_flags(&table, 4, 0.99);
        assert_eq!(flags.high_cardinality, vec!["CODIGO"]);

        let flags = quality_flags(&table, 5, 0.99);
        assert!(flags.high_cardinality.is_empty());
    }

    #[test]
    fn test_duplicate_rows_count_nulls_as_equal() {
        let table = Table::new(vec![
            text("A", &[Some("x"), Some("x"), None, None, Some("y")]),
            text("B", &[Some("1"), Some("1"), None, None, Some("1")]),
        ])
        .unwrap();
        assert_eq!(count_duplicate_rows(&table), 2);
    }

    #[test]
    fn test_candidate_ids() {
        let table = Table::new(vec![
            text("ID", &[Some("1"), Some("2"), Some("3")]),
            text("ID_CON_NULO", &[Some("1"), None, Some("3")]),
            text("DOS_NULOS", &[Some("1"), None, None]),
            text("REPETIDO", &[Some("a"), Some("a"), Some("b")]),
        ])
        .unwrap();

        let flags = quality_flags(&table, 50, 0.99);
        assert_eq!(flags.candidate_ids, vec!["ID", "ID_CON_NULO"]);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::default();
        assert_eq!(quality_flags(&table, 50, 0.99), QualityFlags::default());
    }
}
