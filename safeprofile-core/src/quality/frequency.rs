//! Value counts and missingness shares.

use std::collections::HashMap;

use crate::models::{CellValue, Column, Table};

use super::models::{FrequencyEntry, FrequencyTable};

/// Counts each value of a column, missing values included.
///
/// Entries are sorted by count descending with ties kept in first-seen
/// order, then truncated to `top` when given.
pub fn value_counts(column: &Column, top: Option<usize>) -> FrequencyTable {
    let mut index: HashMap<&CellValue, usize> = HashMap::new();
    let mut entries: Vec<FrequencyEntry> = Vec::new();

    for value in column.values() {
        if let Some(&i) = index.get(value) {
            entries[i].count += 1;
        } else {
            index.insert(value, entries.len());
            entries.push(FrequencyEntry {
                value: value.clone(),
                count: 1,
            });
        }
    }

    entries.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(top) = top {
        entries.truncate(top);
    }

    FrequencyTable {
        column: column.name().to_string(),
        entries,
    }
}

/// Share of missing values per column, highest first, truncated to `top`
/// when given. Ties keep table order.
#[allow(clippy::cast_precision_loss)]
pub fn missing_share(table: &Table, top: Option<usize>) -> Vec<(String, f64)> {
    let mut shares: Vec<(String, f64)> = table
        .columns()
        .iter()
        .map(|c| {
            let share = if c.is_empty() {
                0.0
            } else {
                c.null_count() as f64 / c.len() as f64
            };
            (c.name().to_string(), share)
        })
        .collect();

    shares.sort_by(|a, b| b.1.total_cmp(&a.1));
    if let Some(top) = top {
        shares.truncate(top);
    }
    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_counts_order_and_nulls() {
        let column = Column::from_text(
            "ZONA",
            [Some("b"), None, Some("a"), Some("a"), None, Some("c")],
        );
        let counts = value_counts(&column, None);

        assert_eq!(counts.column, "ZONA");
        // a:2 and NaN:2 tie; NaN was seen first
        assert_eq!(counts.labels(), vec!["NaN", "a", "b", "c"]);
        assert_eq!(counts.counts(), vec![2, 2, 1, 1]);
    }

    #[test]
    fn test_value_counts_truncates() {
        let column = Column::from_text("X", [Some("a"), Some("b"), Some("a"), Some("c")]);
        let counts = value_counts(&column, Some(2));
        assert_eq!(counts.labels(), vec!["a", "b"]);
    }

    #[test]
    fn test_value_counts_numeric_labels() {
        let column = Column::new(
            "EDAD",
            vec![CellValue::Number(3.0), CellValue::Number(3.0), CellValue::Number(1.5)],
        );
        let counts = value_counts(&column, None);
        assert_eq!(counts.labels(), vec!["3", "1.5"]);
    }

    #[test]
    fn test_missing_share_sorted_and_truncated() {
        let table = Table::new(vec![
            Column::from_text("A", [Some("x"), Some("y")]),
            Column::from_text("B", [None::<&str>, None]),
            Column::from_text("C", [Some("x"), None]),
        ])
        .unwrap();

        let shares = missing_share(&table, None);
        let names: Vec<&str> = shares.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
        assert!((shares[1].1 - 0.5).abs() < f64::EPSILON);

        assert_eq!(missing_share(&table, Some(1)).len(), 1);
    }
}
