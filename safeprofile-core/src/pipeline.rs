//! End-to-end profiling run.
//!
//! Stages run in a fixed order and each receives the safe table by shared
//! reference. The first error aborts the run; artifacts already written stay
//! on disk.

use std::path::PathBuf;

use crate::Result;
use crate::charts::{ChartRenderer, PlotRequest, PngChartRenderer};
use crate::config::RunConfig;
use crate::crosstab::{PairCount, cross_tabulate};
use crate::grouping::auto_group_columns;
use crate::loader::load_table;
use crate::models::Table;
use crate::pii::{AnonymizationStats, Anonymizer, PiiClassifier, PiiConfig};
use crate::quality::{
    QualityAnalyzer, QualityFlags, correlation_matrix, missing_share, numeric_summary,
};
use crate::report::{ReportLayout, ReportWriter, ensure_dir};
use crate::text::normalize_columns;

/// Columns shown in the missingness chart.
const MISSING_CHART_TOP: usize = 50;

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Rows in the safe table
    pub rows: usize,
    /// Columns in the safe table
    pub columns: usize,
    /// Columns removed
    pub dropped: usize,
    /// Columns replaced by digests
    pub hashed: usize,
    /// Text columns scrubbed of contact details
    pub scrubbed: usize,
    /// Files written, charts and sidecars counted once per chart
    pub artifacts: usize,
    /// Column lists per PII category
    pub pii: PiiConfig,
    /// Quality flags of the safe table
    pub flags: QualityFlags,
    /// Report directory, absolute when it could be resolved
    pub outdir: PathBuf,
    /// Figures directory, absolute when it could be resolved
    pub figures_dir: PathBuf,
    /// Safe dataset path
    pub safe_dataset: PathBuf,
}

/// A configured profiling run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: RunConfig,
}

impl Pipeline {
    /// Creates a pipeline for a configuration.
    pub const fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Run configuration.
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs with the PNG renderer.
    pub fn run(&self) -> Result<RunSummary> {
        self.run_with_renderer(&mut PngChartRenderer::default())
    }

    /// Runs with a caller-supplied chart renderer.
    pub fn run_with_renderer(&self, renderer: &mut dyn ChartRenderer) -> Result<RunSummary> {
        let config = &self.config;
        config.validate()?;

        let mut writer = ReportWriter::create(ReportLayout::new(&config.outdir))?;
        ensure_dir(&config.interim_dir)?;

        tracing::info!("Loading {}", config.input.display());
        let raw = load_table(&config.input, config.delimiter, config.sheet.as_ref())?;
        let table = normalize_columns(&raw)?;

        tracing::info!("Classifying {} columns", table.column_count());
        let pii = PiiClassifier::new().classify(&table.column_names());
        let (safe, stats) =
            Anonymizer::new(config.anonymizer.clone()).anonymize_with_stats(&table, &pii)?;

        writer.write_table(config.safe_dataset_path(), &safe)?;
        writer.write_json(writer.layout().pii_policy(), &pii)?;

        let flags = self.write_quality(&safe, &mut writer)?;
        self.write_summaries(&safe, &mut writer)?;
        self.write_general_charts(&safe, &mut writer, renderer)?;
        self.write_groups(&safe, &mut writer, renderer)?;
        self.write_cross(&safe, &mut writer, renderer)?;

        tracing::info!(
            "Profiling complete: {} artifacts under {}",
            writer.written(),
            config.outdir.display()
        );

        Ok(self.summary(&safe, stats, pii, flags, writer.written()))
    }

    fn write_quality(&self, safe: &Table, writer: &mut ReportWriter) -> Result<QualityFlags> {
        tracing::info!("Profiling quality");
        let report = QualityAnalyzer::new(self.config.quality.clone()).analyze(safe)?;
        writer.write_data_dictionary(&report.dictionary)?;
        writer.write_json(writer.layout().quality_flags(), &report.flags)?;
        writer.write_json(writer.layout().quality_report(), &report)?;
        Ok(report.flags)
    }

    fn write_summaries(&self, safe: &Table, writer: &mut ReportWriter) -> Result<()> {
        if let Some(summaries) = numeric_summary(safe) {
            tracing::info!("Summarizing {} numeric columns", summaries.len());
            writer.write_numeric_summary(&summaries)?;
        }

        let analyzer = QualityAnalyzer::new(self.config.quality.clone());
        let categorical: Vec<_> = safe.categorical_columns().collect();
        tracing::info!("Writing top values for {} categorical columns", categorical.len());
        for column in categorical {
            let path = writer.layout().top_value_counts(column.name());
            writer.write_value_counts(path, &analyzer.top_values(column))?;
        }
        Ok(())
    }

    fn write_general_charts(
        &self,
        safe: &Table,
        writer: &mut ReportWriter,
        renderer: &mut dyn ChartRenderer,
    ) -> Result<()> {
        let (labels, shares): (Vec<String>, Vec<f64>) =
            missing_share(safe, Some(MISSING_CHART_TOP)).into_iter().unzip();
        let missing = PlotRequest::bar(
            "Porcentaje de valores faltantes por columna",
            labels,
            shares,
            writer.layout().missing_bar(),
        )
        .with_y_label("Proporción");
        renderer.render(&missing)?;
        writer.record();

        if let Some(matrix) = correlation_matrix(safe) {
            let heatmap = PlotRequest::heatmap(
                "Matriz de correlaciones",
                matrix.columns,
                matrix.values,
                writer.layout().corr_matrix(),
            );
            renderer.render(&heatmap)?;
            writer.record();
        }
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn write_groups(
        &self,
        safe: &Table,
        writer: &mut ReportWriter,
        renderer: &mut dyn ChartRenderer,
    ) -> Result<()> {
        let analyzer = QualityAnalyzer::new(self.config.quality.clone());
        let groups = auto_group_columns(&safe.column_names());
        tracing::info!("Writing {} thematic groups", groups.len());

        for group in &groups {
            for name in &group.columns {
                let Some(column) = safe.column(name) else {
                    tracing::debug!("Group column '{}' missing, skipping", name);
                    continue;
                };
                let counts = analyzer.top_values(column);
                writer.write_value_counts(
                    writer.layout().group_value_counts(&group.name, name),
                    &counts,
                )?;

                // horizontal bars list the most frequent value on top
                let mut labels = counts.labels();
                let mut values: Vec<f64> = counts.counts().into_iter().map(|c| c as f64).collect();
                labels.reverse();
                values.reverse();

                let chart = PlotRequest::barh(
                    format!("{} · {}", group.name, name),
                    labels,
                    values,
                    writer.layout().group_chart(&group.name, name),
                )
                .with_x_label("count");
                renderer.render(&chart)?;
                writer.record();
            }
        }
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn write_cross(
        &self,
        safe: &Table,
        writer: &mut ReportWriter,
        renderer: &mut dyn ChartRenderer,
    ) -> Result<()> {
        if self.config.cross.len() < 2 {
            return Ok(());
        }

        let tabs = cross_tabulate(safe, &self.config.cross);
        tracing::info!("Writing {} cross tables", tabs.len());

        for tab in &tabs {
            writer.write_cross_table(tab)?;

            let top = tab.top(self.config.quality.top_n);
            let labels = top.iter().rev().map(PairCount::label).collect();
            let values = top.iter().rev().map(|p| p.count as f64).collect();
            let chart = PlotRequest::barh(tab.title(), labels, values, writer.layout().cross_chart(tab))
                .with_x_label("count");
            renderer.render(&chart)?;
            writer.record();
        }
        Ok(())
    }

    fn summary(
        &self,
        safe: &Table,
        stats: AnonymizationStats,
        pii: PiiConfig,
        flags: QualityFlags,
        artifacts: usize,
    ) -> RunSummary {
        let outdir = std::path::absolute(&self.config.outdir)
            .unwrap_or_else(|_| self.config.outdir.clone());
        let figures_dir = outdir.join("figures");

        RunSummary {
            rows: safe.row_count(),
            columns: safe.column_count(),
            dropped: stats.dropped,
            hashed: stats.hashed,
            scrubbed: stats.scrubbed,
            artifacts,
            pii,
            flags,
            outdir,
            figures_dir,
            safe_dataset: self.config.safe_dataset_path(),
        }
    }
}
