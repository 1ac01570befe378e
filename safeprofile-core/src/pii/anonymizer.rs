//! Builds the safe derivative table.

use crate::models::{Column, ColumnKind, Table};
use crate::text::{normalize, redact_contact_info};
use crate::Result;

use super::classifier::{ColumnPolicy, PiiConfig};
use super::hashing::AnonymizerConfig;

/// Counts of columns touched by each policy in one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnonymizationStats {
    /// Columns removed
    pub dropped: usize,
    /// Columns replaced by digests
    pub hashed: usize,
    /// Text columns scrubbed of contact details
    pub scrubbed: usize,
    /// Text columns normalized only
    pub normalized: usize,
}

/// Applies a [`PiiConfig`] to a table.
#[derive(Debug, Clone, Default)]
pub struct Anonymizer {
    config: AnonymizerConfig,
}

impl Anonymizer {
    /// Creates an anonymizer with the given hashing parameters.
    pub const fn new(config: AnonymizerConfig) -> Self {
        Self { config }
    }

    /// Returns the safe table.
    pub fn anonymize(&self, table: &Table, pii: &PiiConfig) -> Result<Table> {
        self.anonymize_with_stats(table, pii).map(|(safe, _)| safe)
    }

    /// Returns the safe table with per-policy column counts.
    ///
    /// Row count and row order are preserved. Numeric columns outside the
    /// hash list pass through unchanged.
    pub fn anonymize_with_stats(
        &self,
        table: &Table,
        pii: &PiiConfig,
    ) -> Result<(Table, AnonymizationStats)> {
        let mut stats = AnonymizationStats::default();
        let mut columns = Vec::with_capacity(table.column_count());

        for column in table.columns() {
            let policy = pii.policy_for(column.name());
            tracing::debug!("Applying {:?} to column '{}'", policy, column.name());

            let safe = match policy {
                ColumnPolicy::Drop => {
                    stats.dropped += 1;
                    continue;
                }
                ColumnPolicy::Hash => {
                    stats.hashed += 1;
                    column.map_text(|v| Some(self.config.hash(v)))
                }
                ColumnPolicy::ScrubFreetext if column.kind() == ColumnKind::Text => {
                    stats.scrubbed += 1;
                    column.map_text(|v| Some(redact_contact_info(v)))
                }
                ColumnPolicy::ScrubFreetext | ColumnPolicy::NormalizeOnly => {
                    scrub_text_column(column, &mut stats)
                }
            };
            columns.push(safe);
        }

        tracing::info!(
            "Anonymized table: {} dropped, {} hashed, {} scrubbed, {} normalized",
            stats.dropped,
            stats.hashed,
            stats.scrubbed,
            stats.normalized
        );

        Ok((Table::with_row_count(columns, table.row_count())?, stats))
    }
}

/// Normalizes a text column, keeping missing values missing.
fn scrub_text_column(column: &Column, stats: &mut AnonymizationStats) -> Column {
    if column.kind() == ColumnKind::Text {
        stats.normalized += 1;
        column.map_text(|v| v.map(normalize))
    } else {
        column.clone()
    }
}

/// Anonymizes a table with the default salt.
pub fn anonymize(table: &Table, pii: &PiiConfig) -> Result<Table> {
    Anonymizer::default().anonymize(table, pii)
}
