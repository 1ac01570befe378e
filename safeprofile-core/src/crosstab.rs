//! Joint frequencies of adjacent column pairs.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{CellValue, Table};

/// One value combination and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairCount {
    /// Value in the first column
    pub left: CellValue,
    /// Value in the second column
    pub right: CellValue,
    /// Rows holding this combination
    pub count: usize,
}

impl PairCount {
    /// Chart label, `left | right`.
    pub fn label(&self) -> String {
        format!("{} | {}", self.left, self.right)
    }
}

/// Cross-tabulation of two columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossTab {
    /// First column name
    pub left: String,
    /// Second column name
    pub right: String,
    /// Combinations sorted by count descending, ties by first appearance
    pub pairs: Vec<PairCount>,
}

impl CrossTab {
    /// Counts value combinations of two columns, skipping rows where either
    /// value is missing. `None` when either column is absent.
    pub fn compute(table: &Table, left: &str, right: &str) -> Option<Self> {
        let a = table.column(left)?;
        let b = table.column(right)?;

        let mut index: HashMap<(&CellValue, &CellValue), usize> = HashMap::new();
        let mut pairs: Vec<PairCount> = Vec::new();

        for (x, y) in a.values().iter().zip(b.values()) {
            if x.is_null() || y.is_null() {
                continue;
            }
            if let Some(&i) = index.get(&(x, y)) {
                pairs[i].count += 1;
            } else {
                index.insert((x, y), pairs.len());
                pairs.push(PairCount {
                    left: x.clone(),
                    right: y.clone(),
                    count: 1,
                });
            }
        }

        pairs.sort_by(|p, q| q.count.cmp(&p.count));

        Some(Self {
            left: left.to_string(),
            right: right.to_string(),
            pairs,
        })
    }

    /// The `n` most frequent combinations.
    pub fn top(&self, n: usize) -> &[PairCount] {
        &self.pairs[..n.min(self.pairs.len())]
    }

    /// Base name for artifacts, `<left>_x_<right>`.
    pub fn stem(&self) -> String {
        format!("{}_x_{}", self.left, self.right)
    }

    /// Chart title.
    pub fn title(&self) -> String {
        format!("Top pares · {} × {}", self.left, self.right)
    }
}

/// Cross-tabulates each adjacent pair of the requested columns.
///
/// Names not present in the table are skipped; with fewer than two present
/// names the result is empty. Only adjacent pairs are formed.
pub fn cross_tabulate<S: AsRef<str>>(table: &Table, requested: &[S]) -> Vec<CrossTab> {
    let present: Vec<&str> = requested
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| {
            let found = table.has_column(name);
            if !found {
                tracing::debug!("Cross column '{}' not in safe table, skipping", name);
            }
            found
        })
        .collect();

    if present.len() < 2 {
        return Vec::new();
    }

    present
        .windows(2)
        .filter_map(|pair| CrossTab::compute(table, pair[0], pair[1]))
        .collect()
}
