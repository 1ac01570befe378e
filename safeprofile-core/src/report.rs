//! Report artifact layout and writers.
//!
//! All artifact names derived from column names pass through
//! [`safe_filename`]. Frequency CSVs use the header `<col>,count`; missing
//! values are written as empty fields.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::Result;
use crate::crosstab::CrossTab;
use crate::error::ProfileError;
use crate::models::{CellValue, Table};
use crate::quality::{ColumnProfile, FrequencyTable, NumericSummary};
use crate::text::safe_filename;

/// Paths of every artifact under a report directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    outdir: PathBuf,
}

impl ReportLayout {
    /// Layout rooted at `outdir`.
    pub fn new(outdir: impl Into<PathBuf>) -> Self {
        Self {
            outdir: outdir.into(),
        }
    }

    /// Report root.
    pub fn outdir(&self) -> &Path {
        &self.outdir
    }

    /// `figures/`
    pub fn figures_dir(&self) -> PathBuf {
        self.outdir.join("figures")
    }

    /// `data_dictionary.csv`
    pub fn data_dictionary(&self) -> PathBuf {
        self.outdir.join("data_dictionary.csv")
    }

    /// `quality_flags.json`
    pub fn quality_flags(&self) -> PathBuf {
        self.outdir.join("quality_flags.json")
    }

    /// `quality_report.json`
    pub fn quality_report(&self) -> PathBuf {
        self.outdir.join("quality_report.json")
    }

    /// `pii_policy.json`
    pub fn pii_policy(&self) -> PathBuf {
        self.outdir.join("pii_policy.json")
    }

    /// `numeric_summary.csv`
    pub fn numeric_summary(&self) -> PathBuf {
        self.outdir.join("numeric_summary.csv")
    }

    /// `<col>_top_value_counts.csv`
    pub fn top_value_counts(&self, column: &str) -> PathBuf {
        self.outdir
            .join(format!("{}_top_value_counts.csv", safe_filename(column)))
    }

    /// `figures/missing_bar.png`
    pub fn missing_bar(&self) -> PathBuf {
        self.figures_dir().join("missing_bar.png")
    }

    /// `figures/corr_matrix.png`
    pub fn corr_matrix(&self) -> PathBuf {
        self.figures_dir().join("corr_matrix.png")
    }

    /// `groups/<group>/<col>_value_counts.csv`
    pub fn group_value_counts(&self, group: &str, column: &str) -> PathBuf {
        self.outdir
            .join("groups")
            .join(safe_filename(group))
            .join(format!("{}_value_counts.csv", safe_filename(column)))
    }

    /// `figures/groups/<group>/<col>.png`
    pub fn group_chart(&self, group: &str, column: &str) -> PathBuf {
        self.figures_dir()
            .join("groups")
            .join(safe_filename(group))
            .join(format!("{}.png", safe_filename(column)))
    }

    /// `cross/<a>_x_<b>.csv`
    pub fn cross_table(&self, tab: &CrossTab) -> PathBuf {
        self.outdir
            .join("cross")
            .join(format!("{}.csv", safe_filename(&tab.stem())))
    }

    /// `figures/cross/<a>_x_<b>_top_pairs.png`
    pub fn cross_chart(&self, tab: &CrossTab) -> PathBuf {
        self.figures_dir()
            .join("cross")
            .join(format!("{}_top_pairs.png", safe_filename(&tab.stem())))
    }

    /// Directories created before any artifact is written.
    pub fn base_dirs(&self) -> Vec<PathBuf> {
        let figures = self.figures_dir();
        vec![
            self.outdir.clone(),
            figures.join("groups"),
            figures.join("cross"),
            self.outdir.join("groups"),
            self.outdir.join("cross"),
            figures,
        ]
    }
}

/// Writes report artifacts and counts them.
#[derive(Debug)]
pub struct ReportWriter {
    layout: ReportLayout,
    written: usize,
}

impl ReportWriter {
    /// Creates a writer and the report directory tree.
    pub fn create(layout: ReportLayout) -> Result<Self> {
        for dir in layout.base_dirs() {
            ensure_dir(&dir)?;
        }
        Ok(Self { layout, written: 0 })
    }

    /// Artifact paths.
    pub const fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    /// Number of files written so far.
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Records a file produced elsewhere, such as a rendered chart.
    pub const fn record(&mut self) {
        self.written += 1;
    }

    /// Writes `data_dictionary.csv`.
    pub fn write_data_dictionary(&mut self, dictionary: &[ColumnProfile]) -> Result<PathBuf> {
        let path = self.layout.data_dictionary();
        let mut writer = csv_writer(&path)?;
        writer.write_record(["column", "dtype", "non_null", "nulls", "null_pct", "n_unique"])?;
        for profile in dictionary {
            writer.write_record([
                profile.column.clone(),
                profile.dtype.to_string(),
                profile.non_null.to_string(),
                profile.nulls.to_string(),
                profile.null_pct.to_string(),
                profile.n_unique.to_string(),
            ])?;
        }
        self.finish(writer, path)
    }

    /// Writes pretty-printed JSON.
    pub fn write_json<T: Serialize>(&mut self, path: PathBuf, value: &T) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(value).map_err(|e| {
            ProfileError::serialization(format!("serializing {}", path.display()), e)
        })?;
        fs::write(&path, json)
            .map_err(|e| ProfileError::io(format!("writing {}", path.display()), e))?;
        self.written += 1;
        tracing::debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Writes `numeric_summary.csv`: one row per statistic, one column per
    /// numeric column.
    pub fn write_numeric_summary(&mut self, summaries: &[NumericSummary]) -> Result<PathBuf> {
        let path = self.layout.numeric_summary();
        let mut writer = csv_writer(&path)?;

        let mut header = vec![String::new()];
        header.extend(summaries.iter().map(|s| s.column.clone()));
        writer.write_record(&header)?;

        let stats: Vec<[Option<f64>; 8]> = summaries.iter().map(NumericSummary::stats).collect();
        for (i, label) in NumericSummary::STAT_LABELS.iter().enumerate() {
            let mut record = vec![(*label).to_string()];
            record.extend(
                stats
                    .iter()
                    .map(|s| s[i].map(|v| v.to_string()).unwrap_or_default()),
            );
            writer.write_record(&record)?;
        }
        self.finish(writer, path)
    }

    /// Writes a frequency table as `<col>,count`.
    pub fn write_value_counts(&mut self, path: PathBuf, table: &FrequencyTable) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let mut writer = csv_writer(&path)?;
        writer.write_record([table.column.as_str(), "count"])?;
        for entry in &table.entries {
            writer.write_record([cell_text(&entry.value), entry.count.to_string()])?;
        }
        self.finish(writer, path)
    }

    /// Writes a full cross table as `<a>,<b>,count`.
    pub fn write_cross_table(&mut self, tab: &CrossTab) -> Result<PathBuf> {
        let path = self.layout.cross_table(tab);
        let mut writer = csv_writer(&path)?;
        writer.write_record([tab.left.as_str(), tab.right.as_str(), "count"])?;
        for pair in &tab.pairs {
            writer.write_record([
                cell_text(&pair.left),
                cell_text(&pair.right),
                pair.count.to_string(),
            ])?;
        }
        self.finish(writer, path)
    }

    /// Writes a table as CSV with a header row and no index.
    pub fn write_table(&mut self, path: PathBuf, table: &Table) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let mut writer = csv_writer(&path)?;
        writer.write_record(table.column_names())?;
        for i in 0..table.row_count() {
            writer.write_record(table.row(i).into_iter().map(cell_text))?;
        }
        self.finish(writer, path)
    }

    fn finish(&mut self, mut writer: csv::Writer<fs::File>, path: PathBuf) -> Result<PathBuf> {
        writer
            .flush()
            .map_err(|e| ProfileError::io(format!("writing {}", path.display()), e))?;
        self.written += 1;
        tracing::debug!("Wrote {}", path.display());
        Ok(path)
    }
}

/// Creates a directory and its parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| ProfileError::io(format!("creating {}", path.display()), e))
}

fn csv_writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    csv::Writer::from_path(path).map_err(ProfileError::from)
}

fn cell_text(value: &CellValue) -> String {
    value.as_text().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;
    use crate::quality::{data_dictionary, numeric_summary, value_counts};

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_layout_paths_are_sanitized() {
        let layout = ReportLayout::new("out");
        assert_eq!(
            layout.top_value_counts("ZONA/RURAL"),
            PathBuf::from("out/ZONA_RURAL_top_value_counts.csv")
        );
        assert_eq!(
            layout.quality_report(),
            PathBuf::from("out/quality_report.json")
        );
        assert_eq!(
            layout.group_chart("demografia", "EDAD MADRE"),
            PathBuf::from("out/figures/groups/demografia/EDAD_MADRE.png")
        );
    }

    #[test]
    fn test_create_makes_directory_tree() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::create(ReportLayout::new(dir.path().join("r"))).unwrap();
        for sub in ["figures/groups", "figures/cross", "groups", "cross"] {
            assert!(dir.path().join("r").join(sub).is_dir(), "{sub}");
        }
        assert_eq!(writer.written(), 0);
    }

    #[test]
    fn test_value_counts_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ReportWriter::create(ReportLayout::new(dir.path())).unwrap();
        let column = Column::from_text("ZONA", [Some("rural"), None, Some("rural")]);
        let path = writer
            .write_value_counts(
                writer.layout().top_value_counts("ZONA"),
                &value_counts(&column, None),
            )
            .unwrap();

        assert_eq!(read(&path), "ZONA,count\nrural,2\n,1\n");
        assert_eq!(writer.written(), 1);
    }

    #[test]
    fn test_numeric_summary_layout() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ReportWriter::create(ReportLayout::new(dir.path())).unwrap();
        let table = Table::new(vec![Column::new(
            "EDAD",
            vec![CellValue::Number(2.0), CellValue::Number(4.0)],
        )])
        .unwrap();

        let path = writer
            .write_numeric_summary(&numeric_summary(&table).unwrap())
            .unwrap();
        let content = read(&path);
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], ",EDAD");
        assert_eq!(lines[1], "count,2");
        assert_eq!(lines[2], "mean,3");
        assert_eq!(lines[8], "max,4");
    }

    #[test]
    fn test_data_dictionary_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ReportWriter::create(ReportLayout::new(dir.path())).unwrap();
        let table = Table::new(vec![Column::from_text("ZONA", [Some("a"), None])]).unwrap();
        let path = writer.write_data_dictionary(&data_dictionary(&table)).unwrap();
        assert_eq!(
            read(&path),
            "column,dtype,non_null,nulls,null_pct,n_unique\nZONA,text,1,1,50,1\n"
        );
    }

    #[test]
    fn test_table_csv_writes_missing_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ReportWriter::create(ReportLayout::new(dir.path().join("r"))).unwrap();
        let table = Table::new(vec![
            Column::from_text("A", [Some("x"), None]),
            Column::new("B", vec![CellValue::Number(1.0), CellValue::Number(2.5)]),
        ])
        .unwrap();

        let path = writer
            .write_table(dir.path().join("interim/sample_head.csv"), &table)
            .unwrap();
        assert_eq!(read(&path), "A,B\nx,1\n,2.5\n");
    }

    #[test]
    fn test_json_is_pretty() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ReportWriter::create(ReportLayout::new(dir.path())).unwrap();
        let path = writer
            .write_json(writer.layout().pii_policy(), &serde_json::json!({"drop": ["NOMBRE"]}))
            .unwrap();
        assert!(read(&path).contains("\n  \"drop\""));
    }
}
