//! Descriptive statistics for numeric columns.

use crate::models::{CellValue, Column, Table};

use super::models::{CorrelationMatrix, NumericSummary};

/// Summarizes every numeric column. `None` when the table has none.
pub fn numeric_summary(table: &Table) -> Option<Vec<NumericSummary>> {
    let summaries: Vec<NumericSummary> = table.numeric_columns().map(summarize).collect();
    if summaries.is_empty() {
        None
    } else {
        Some(summaries)
    }
}

#[allow(clippy::cast_precision_loss)]
fn summarize(column: &Column) -> NumericSummary {
    let mut values: Vec<f64> = column.values().iter().filter_map(CellValue::as_f64).collect();
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
    let std = mean.filter(|_| count > 1).map(|m| {
        let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    });

    NumericSummary {
        column: column.name().to_string(),
        count,
        mean,
        std,
        min: values.first().copied(),
        p25: quantile(&values, 0.25),
        p50: quantile(&values, 0.5),
        p75: quantile(&values, 0.75),
        max: values.last().copied(),
    }
}

/// Linearly interpolated quantile of sorted values.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let (lo, hi) = (*sorted.get(lower)?, *sorted.get(upper)?);
    Some((hi - lo).mul_add(position - lower as f64, lo))
}

/// Pearson correlations between numeric columns, using rows where both
/// values are present. `None` with fewer than two numeric columns.
pub fn correlation_matrix(table: &Table) -> Option<CorrelationMatrix> {
    let numeric: Vec<&Column> = table.numeric_columns().collect();
    if numeric.len() < 2 {
        return None;
    }

    let values = numeric
        .iter()
        .map(|a| numeric.iter().map(|b| pearson(a, b)).collect())
        .collect();

    Some(CorrelationMatrix {
        columns: numeric.iter().map(|c| c.name().to_string()).collect(),
        values,
    })
}

/// Pairwise-complete Pearson coefficient; `None` when fewer than two pairs
/// or either side has zero variance.
#[allow(clippy::cast_precision_loss)]
fn pearson(a: &Column, b: &Column) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .values()
        .iter()
        .zip(b.values())
        .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(name: &str, values: &[Option<f64>]) -> Column {
        Column::new(
            name,
            values
                .iter()
                .map(|v| v.map_or(CellValue::Null, CellValue::Number))
                .collect(),
        )
    }

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_summary_matches_describe() {
        let table = Table::new(vec![numbers(
            "EDAD",
            &[Some(1.0), Some(2.0), Some(3.0), Some(4.0), None],
        )])
        .unwrap();

        let summary = &numeric_summary(&table).unwrap()[0];
        assert_eq!(summary.count, 4);
        assert!(close(summary.mean, 2.5));
        assert!(close(summary.std, 1.290_994_448_735_805_6));
        assert!(close(summary.min, 1.0));
        assert!(close(summary.p25, 1.75));
        assert!(close(summary.p50, 2.5));
        assert!(close(summary.p75, 3.25));
        assert!(close(summary.max, 4.0));
    }

    #[test]
    fn test_single_value_has_no_std() {
        let table = Table::new(vec![numbers("X", &[Some(7.0)])]).unwrap();
        let summary = &numeric_summary(&table).unwrap()[0];
        assert_eq!(summary.std, None);
        assert!(close(summary.p75, 7.0));
    }

    #[test]
    fn test_no_numeric_columns() {
        let table = Table::new(vec![Column::from_text("ZONA", [Some("a")])]).unwrap();
        assert!(numeric_summary(&table).is_none());
        assert!(correlation_matrix(&table).is_none());
    }

    #[test]
    fn test_correlation_pairwise_complete() {
        let table = Table::new(vec![
            numbers("A", &[Some(1.0), Some(2.0), Some(3.0), None]),
            numbers("B", &[Some(2.0), Some(4.0), Some(6.0), Some(100.0)]),
            numbers("C", &[Some(3.0), Some(2.0), Some(1.0), Some(0.0)]),
        ])
        .unwrap();

        let matrix = correlation_matrix(&table).unwrap();
        assert_eq!(matrix.columns, vec!["A", "B", "C"]);
        assert!(close(matrix.get(0, 1), 1.0));
        assert!(close(matrix.get(0, 2), -1.0));
        assert!(close(matrix.get(1, 1), 1.0));
        assert_eq!(matrix.get(0, 1), matrix.get(1, 0));
    }

    #[test]
    fn test_constant_column_correlation_undefined() {
        let table = Table::new(vec![
            numbers("A", &[Some(1.0), Some(1.0), Some(1.0)]),
            numbers("B", &[Some(1.0), Some(2.0), Some(3.0)]),
        ])
        .unwrap();

        let matrix = correlation_matrix(&table).unwrap();
        assert_eq!(matrix.get(0, 1), None);
        assert_eq!(matrix.get(0, 0), None);
    }

    #[test]
    fn test_single_numeric_column_has_no_matrix() {
        let table = Table::new(vec![numbers("A", &[Some(1.0), Some(2.0)])]).unwrap();
        assert!(correlation_matrix(&table).is_none());
    }
}
