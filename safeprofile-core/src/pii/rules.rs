//! Header rule table for PII classification.
//!
//! Rules are data: adding a category of sensitive header means appending a
//! row to [`HEADER_RULES`]. Patterns are matched case-insensitively against
//! canonical column names and may match anywhere in the name.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Category a header rule assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PiiCategory {
    /// Identity fields removed from the output
    Drop,
    /// Identifier fields replaced by a salted digest
    Hash,
    /// Narrative fields scrubbed of contact details
    Freetext,
}

impl PiiCategory {
    /// All categories in evaluation order.
    pub const ALL: [Self; 3] = [Self::Drop, Self::Hash, Self::Freetext];
}

/// A single header rule.
#[derive(Debug, Clone, Copy)]
pub struct HeaderRule {
    /// Category assigned on match
    pub category: PiiCategory,
    /// Regex searched in the column name
    pub pattern: &'static str,
    /// Human-readable description of what was detected
    pub description: &'static str,
}

const fn rule(
    category: PiiCategory,
    pattern: &'static str,
    description: &'static str,
) -> HeaderRule {
    HeaderRule {
        category,
        pattern,
        description,
    }
}

/// Built-in header rules, evaluated in declaration order within a category.
pub const HEADER_RULES: &[HeaderRule] = &[
    // Identity fields
    rule(PiiCategory::Drop, r"\bNOMBRE\b", "Person name"),
    rule(PiiCategory::Drop, r"\bAPELLIDO", "Surname"),
    rule(PiiCategory::Drop, r"\bDOC(U|)MENT", "Document number"),
    rule(PiiCategory::Drop, r"\bIDENTIFICACI(ON|ÓN)", "Identification number"),
    rule(PiiCategory::Drop, r"\bCEDULA|\bC[EÉ]DULA", "National ID"),
    rule(PiiCategory::Drop, r"\bDIREC", "Address"),
    rule(PiiCategory::Drop, r"\bCORREO|\bEMAIL", "E-mail address"),
    rule(PiiCategory::Drop, r"\bTELEF", "Telephone"),
    rule(PiiCategory::Drop, r"\bCELULAR", "Mobile phone"),
    rule(PiiCategory::Drop, r"\bFACTURA", "Invoice number"),
    rule(PiiCategory::Drop, r"\bCONTRATO", "Contract number"),
    rule(PiiCategory::Drop, r"\bCUENTA\b", "Account number"),
    rule(PiiCategory::Drop, r"\bUSUARIO\b", "User"),
    rule(PiiCategory::Drop, r"\bCONTACTO", "Contact"),
    rule(PiiCategory::Drop, r"\bRESPONSABLE", "Responsible party"),
    rule(PiiCategory::Drop, r"\bACUDIENTE", "Guardian"),
    rule(PiiCategory::Drop, r"\bM[AE]DICO", "Medical professional"),
    rule(PiiCategory::Drop, r"\bPROFESIONAL", "Professional"),
    // Role identifiers kept for grouping
    rule(PiiCategory::Hash, r"\bENCUESTADOR\b", "Surveyor"),
    rule(PiiCategory::Hash, r"\bENTREVISTADOR\b", "Interviewer"),
    rule(PiiCategory::Hash, r"\bUSUARIO\b", "User"),
    rule(PiiCategory::Hash, r"\bPROFESIONAL\b", "Professional"),
    // Narrative fields
    rule(PiiCategory::Freetext, r"\bOTRO", "Free-form other"),
    rule(PiiCategory::Freetext, r"\bOBSERVA", "Observation"),
    rule(PiiCategory::Freetext, r"\bCOMENT", "Comment"),
    rule(PiiCategory::Freetext, r"\bDESCRIP", "Description"),
    rule(PiiCategory::Freetext, r"\bNOTA", "Note"),
];

/// A header rule with its compiled regex.
#[derive(Debug)]
pub struct CompiledRule {
    /// Source rule
    pub rule: HeaderRule,
    /// Case-insensitive compiled pattern
    pub regex: Regex,
}

impl CompiledRule {
    /// True when the rule's pattern occurs in `column`.
    pub fn matches(&self, column: &str) -> bool {
        self.regex.is_match(column)
    }
}

/// Compiles rules case-insensitively, skipping (and logging) invalid ones.
pub fn compile_rules(rules: &[HeaderRule]) -> Vec<CompiledRule> {
    rules
        .iter()
        .filter_map(|rule| {
            match RegexBuilder::new(rule.pattern)
                .case_insensitive(true)
                .build()
            {
                Ok(regex) => Some(CompiledRule { rule: *rule, regex }),
                Err(e) => {
                    tracing::warn!("Skipping invalid header rule '{}': {}", rule.pattern, e);
                    None
                }
            }
        })
        .collect()
}

/// Process-wide compiled copy of [`HEADER_RULES`].
pub fn builtin_rules() -> &'static [CompiledRule] {
    static RULES: OnceLock<Vec<CompiledRule>> = OnceLock::new();
    RULES.get_or_init(|| compile_rules(HEADER_RULES))
}
