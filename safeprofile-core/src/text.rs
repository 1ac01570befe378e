//! Free-text canonicalization and contact-info scrubbing.
//!
//! Everything here is a pure string transformation. Header canonicalization
//! and file-name sanitizing live here too since they build on [`normalize`].

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::canonical_combining_class;

use crate::{Result, models::Table};

/// Placeholder written in place of an e-mail address.
pub const EMAIL_PLACEHOLDER: &str = "[EMAIL]";
/// Placeholder written in place of a phone number.
pub const PHONE_PLACEHOLDER: &str = "[TEL]";

/// Maximum length of a generated file-name fragment.
pub const MAX_FILENAME_LEN: usize = 150;

/// Pre-compiled patterns for text scrubbing.
struct TextPatterns {
    email: Regex,
    phone: Regex,
    whitespace: Regex,
    unsafe_filename: Regex,
}

impl TextPatterns {
    fn instance() -> &'static Self {
        static PATTERNS: OnceLock<TextPatterns> = OnceLock::new();
        PATTERNS.get_or_init(Self::compile)
    }

    #[allow(clippy::expect_used)]
    fn compile() -> Self {
        Self {
            email: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
                .expect("Invalid email pattern"),
            phone: Regex::new(r"\b(?:\+?\d[\s-]?){8,}\b").expect("Invalid phone pattern"),
            whitespace: Regex::new(r"\s+").expect("Invalid whitespace pattern"),
            unsafe_filename: Regex::new(r"[^A-Za-z0-9._-]+").expect("Invalid filename pattern"),
        }
    }
}

/// Removes diacritics: NFKD decomposition, then drops combining marks.
fn strip_accents(s: &str) -> String {
    s.nfkd()
        .filter(|c| canonical_combining_class(*c) == 0)
        .collect()
}

/// Canonicalizes free text.
///
/// Strips accents, trims, and collapses whitespace runs to one space.
/// Idempotent.
///
/// ```rust
/// use safeprofile_core::text::normalize;
///
/// assert_eq!(normalize("  Población   rural "), "Poblacion rural");
/// ```
pub fn normalize(text: &str) -> String {
    let stripped = strip_accents(text);
    TextPatterns::instance()
        .whitespace
        .replace_all(stripped.trim(), " ")
        .into_owned()
}

/// Replaces e-mail addresses and phone numbers with placeholders, then
/// normalizes. A missing value yields an empty string.
///
/// ```rust
/// use safeprofile_core::text::redact_contact_info;
///
/// let out = redact_contact_info(Some("escribir a ana@x.com o al 300 123 4567"));
/// assert_eq!(out, "escribir a [EMAIL] o al [TEL]");
/// assert_eq!(redact_contact_info(None), "");
/// ```
pub fn redact_contact_info(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    let patterns = TextPatterns::instance();
    let without_email = patterns.email.replace_all(text, EMAIL_PLACEHOLDER);
    let without_phone = patterns.phone.replace_all(&without_email, PHONE_PLACEHOLDER);
    normalize(&without_phone)
}

/// Turns a header into an identifier usable as a map key and path fragment.
pub fn canonicalize_header(text: &str) -> String {
    let normalized = normalize(text);
    TextPatterns::instance()
        .whitespace
        .replace_all(&normalized, "_")
        .into_owned()
}

/// Restricts a string to `[A-Za-z0-9._-]`, bounded to [`MAX_FILENAME_LEN`].
pub fn safe_filename(text: &str) -> String {
    TextPatterns::instance()
        .unsafe_filename
        .replace_all(text, "_")
        .chars()
        .take(MAX_FILENAME_LEN)
        .collect()
}

/// Canonicalizes every header of a table.
///
/// Headers that collapse onto an existing name get a `.N` suffix so the
/// table keeps unique names.
pub fn normalize_columns(table: &Table) -> Result<Table> {
    let mut used: Vec<String> = Vec::with_capacity(table.column_count());
    let mut columns = Vec::with_capacity(table.column_count());

    for column in table.columns() {
        let base = canonicalize_header(column.name());
        let mut name = base.clone();
        let mut suffix = 1_usize;
        while used.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        if name != base {
            tracing::warn!(
                "Header '{}' collides after canonicalization; renamed to '{}'",
                column.name(),
                name
            );
        }
        used.push(name.clone());
        columns.push(column.renamed(name));
    }

    Table::with_row_count(columns, table.row_count())
}
