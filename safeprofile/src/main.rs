//! Privacy-safe data understanding tool.
//!
//! This binary reads a CSV or Excel file, removes or pseudonymizes columns
//! that carry personal data, and writes a data-quality profile with charts
//! computed on the safe copy only.
//!
//! # Privacy Guarantees
//! - Identity columns never reach the profiling stages
//! - Operator columns are replaced by salted SHA-256 prefixes
//! - Free-text columns are scrubbed of e-mail addresses and phone numbers
//! - Logs carry column names and counts only

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser};
use safeprofile_core::{
    DelimiterMode, Pipeline, RunConfig, RunSummary, SheetSelector,
    config::{DEFAULT_INTERIM_DIR, DEFAULT_OUTDIR},
    init_logging,
    pii::{AnonymizerConfig, DEFAULT_SALT},
    quality::{
        DEFAULT_CONST_THRESHOLD, DEFAULT_HIGH_CARD_THRESHOLD, DEFAULT_TOP_N, QualityConfig,
    },
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "safeprofile")]
#[command(about = "Privacy-safe data profiling for CSV and Excel files")]
#[command(version)]
#[command(long_about = "
SafeProfile - Privacy-safe data understanding

This tool profiles a tabular dataset after removing personal data:
- Data dictionary, quality flags and numeric summaries
- Top values per categorical column
- Missing-value and correlation charts
- Thematic column groups and cross-tabulations

PRIVACY FEATURES:
- Identity columns (names, documents, contact details) are dropped
- Operator columns are replaced by salted digests
- Free-text columns are scrubbed of e-mails and phone numbers

EXAMPLES:
  safeprofile --input data/raw/encuesta.xlsx
  safeprofile --input data.csv --sep ';' --cross ZONA ESTRATO SEXO
  SAFEPROFILE_SALT=s3cret safeprofile --input data.csv --outdir reports
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Input file
    #[arg(long, help = "Input file (.csv, .tsv, .txt, .xlsx, .xls, .ods)")]
    pub input: PathBuf,

    /// Field delimiter for text inputs
    #[arg(
        long,
        default_value = "auto",
        help = "Field delimiter: 'auto', a single character, or '\\t'"
    )]
    pub sep: DelimiterMode,

    /// Worksheet for spreadsheet inputs
    #[arg(long, help = "Worksheet index (0-based) or name; first sheet if omitted")]
    pub sheet: Option<SheetSelector>,

    /// Report directory
    #[arg(long, default_value = DEFAULT_OUTDIR)]
    pub outdir: PathBuf,

    /// Safe dataset directory
    #[arg(long, default_value = DEFAULT_INTERIM_DIR)]
    pub interim_dir: PathBuf,

    /// Values kept per frequency table
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Distinct values above which a text column is flagged
    #[arg(long, default_value_t = DEFAULT_HIGH_CARD_THRESHOLD)]
    pub high_card_threshold: usize,

    /// Share of the modal value at which a column is flagged
    #[arg(long, default_value_t = DEFAULT_CONST_THRESHOLD)]
    pub const_threshold: f64,

    /// Columns to cross-tabulate in adjacent pairs
    #[arg(long, num_args = 2.., value_name = "COLUMN")]
    pub cross: Vec<String>,

    /// Hashing salt
    #[arg(
        long,
        env = "SAFEPROFILE_SALT",
        default_value = DEFAULT_SALT,
        hide_env_values = true,
        help = "Salt for hashed columns (never logged)"
    )]
    pub salt: String,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,
}

impl Cli {
    /// Builds the run configuration from parsed arguments.
    fn run_config(&self) -> RunConfig {
        let quality = QualityConfig::new()
            .with_top_n(self.top)
            .with_high_card_threshold(self.high_card_threshold)
            .with_const_threshold(self.const_threshold);

        RunConfig::new(&self.input)
            .with_delimiter(self.sep)
            .with_sheet(self.sheet.clone())
            .with_outdir(&self.outdir)
            .with_interim_dir(&self.interim_dir)
            .with_quality(quality)
            .with_anonymizer(AnonymizerConfig::with_salt(self.salt.clone()))
            .with_cross(self.cross.clone())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    let config = cli.run_config();
    info!("Profiling {}", config.input.display());

    let summary = Pipeline::new(config)
        .run()
        .map_err(|e| {
            error!("Profiling failed: {}", e);
            e
        })
        .with_context(|| format!("Failed to profile {}", cli.input.display()))?;

    info!(
        "Dropped {} columns, hashed {}, scrubbed {}; wrote {} artifacts",
        summary.dropped, summary.hashed, summary.scrubbed, summary.artifacts
    );
    print_summary(&summary);

    Ok(())
}

/// Prints the completion message.
fn print_summary(summary: &RunSummary) {
    println!("[OK] Data Understanding seguro AUTO + figuras completado.");
    println!(
        "    Filas x Columnas (post-seguro): {} x {}",
        summary.rows, summary.columns
    );
    println!("    Reportes: {}", summary.outdir.display());
    println!("    Figuras: {}", summary.figures_dir.display());
}
