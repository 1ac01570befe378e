//! PII detection and redaction.
//!
//! Column headers are matched against [`rules::HEADER_RULES`] to build a
//! [`PiiConfig`]; the [`Anonymizer`] then drops, hashes or scrubs columns
//! accordingly. Classification looks at names only, never at values.

pub mod anonymizer;
pub mod classifier;
pub mod hashing;
pub mod rules;

pub use anonymizer::{AnonymizationStats, Anonymizer, anonymize};
pub use classifier::{ColumnPolicy, PiiClassifier, PiiConfig};
pub use hashing::{AnonymizerConfig, DEFAULT_PREFIX_LEN, DEFAULT_SALT, hash_value};
pub use rules::{HeaderRule, PiiCategory, builtin_rules};

/// Classifies column names with the built-in rules.
pub fn classify<S: AsRef<str>>(columns: &[S]) -> PiiConfig {
    PiiClassifier::new().classify(columns)
}
