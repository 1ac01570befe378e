//! Header-based PII classification.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::rules::{CompiledRule, PiiCategory, builtin_rules};

/// Policy applied to one column by the anonymizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnPolicy {
    /// Column is removed
    Drop,
    /// Values become salted digests
    Hash,
    /// Values are scrubbed of contact details
    ScrubFreetext,
    /// Text values are normalized, other values kept
    NormalizeOnly,
}

/// Column lists per PII category.
///
/// Each list keeps first-seen match order and holds no duplicates. A column
/// may appear in several lists; [`PiiConfig::policy_for`] resolves the one
/// policy that applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiConfig {
    /// Columns removed from the output
    pub drop: Vec<String>,
    /// Columns replaced by salted digests
    pub hash: Vec<String>,
    /// Columns scrubbed of e-mail addresses and phone numbers
    pub freetext: Vec<String>,
}

impl PiiConfig {
    /// Columns assigned to a category.
    pub fn columns(&self, category: PiiCategory) -> &[String] {
        match category {
            PiiCategory::Drop => &self.drop,
            PiiCategory::Hash => &self.hash,
            PiiCategory::Freetext => &self.freetext,
        }
    }

    /// True when the column is in the drop list.
    pub fn is_dropped(&self, column: &str) -> bool {
        self.drop.iter().any(|c| c == column)
    }

    /// True when the column is in the hash list.
    pub fn is_hashed(&self, column: &str) -> bool {
        self.hash.iter().any(|c| c == column)
    }

    /// True when the column is in the freetext list.
    pub fn is_freetext(&self, column: &str) -> bool {
        self.freetext.iter().any(|c| c == column)
    }

    /// The single policy for a column. Drop outranks hash, hash outranks
    /// freetext.
    pub fn policy_for(&self, column: &str) -> ColumnPolicy {
        if self.is_dropped(column) {
            ColumnPolicy::Drop
        } else if self.is_hashed(column) {
            ColumnPolicy::Hash
        } else if self.is_freetext(column) {
            ColumnPolicy::ScrubFreetext
        } else {
            ColumnPolicy::NormalizeOnly
        }
    }
}

/// Classifies column headers against a rule table.
#[derive(Debug, Clone, Copy)]
pub struct PiiClassifier {
    rules: &'static [CompiledRule],
}

impl Default for PiiClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PiiClassifier {
    /// Creates a classifier over the built-in header rules.
    pub fn new() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// Builds the category lists for a set of column names.
    pub fn classify<S: AsRef<str>>(&self, columns: &[S]) -> PiiConfig {
        let config = PiiConfig {
            drop: self.detect(PiiCategory::Drop, columns),
            hash: self.detect(PiiCategory::Hash, columns),
            freetext: self.detect(PiiCategory::Freetext, columns),
        };

        for column in columns {
            let column = column.as_ref();
            let policy = config.policy_for(column);
            let category = match policy {
                ColumnPolicy::Drop => PiiCategory::Drop,
                ColumnPolicy::Hash => PiiCategory::Hash,
                ColumnPolicy::ScrubFreetext => PiiCategory::Freetext,
                ColumnPolicy::NormalizeOnly => continue,
            };
            let reason = self
                .rules
                .iter()
                .find(|r| r.rule.category == category && r.matches(column))
                .map_or("", |r| r.rule.description);
            tracing::debug!("Column '{}' -> {:?} ({})", column, policy, reason);
        }

        tracing::info!(
            "PII classification: {} drop, {} hash, {} freetext",
            config.drop.len(),
            config.hash.len(),
            config.freetext.len()
        );

        config
    }

    /// Columns matching any rule of one category.
    ///
    /// Iterates rules in declaration order, and for each rule the columns in
    /// input order, then drops repeats keeping the first occurrence.
    fn detect<S: AsRef<str>>(&self, category: PiiCategory, columns: &[S]) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut matched = Vec::new();

        for rule in self.rules.iter().filter(|r| r.rule.category == category) {
            for column in columns {
                let column = column.as_ref();
                if rule.matches(column) && seen.insert(column) {
                    matched.push(column.to_string());
                }
            }
        }

        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(columns: &[&str]) -> PiiConfig {
        PiiClassifier::new().classify(columns)
    }

    #[test]
    fn test_identity_columns_dropped() {
        let config = classify(&["NOMBRE", "EDAD", "CORREO", "OBSERVACIONES"]);
        assert_eq!(config.drop, vec!["NOMBRE", "CORREO"]);
        assert!(config.hash.is_empty());
        assert_eq!(config.freetext, vec!["OBSERVACIONES"]);
    }

    #[test]
    fn test_order_follows_rules_then_columns() {
        // APELLIDO's rule is declared before TELEF's; PRIMER_APELLIDO has no
        // word boundary before the match
        let config = classify(&["TELEFONO_FIJO", "PRIMER_APELLIDO", "APELLIDO"]);
        assert_eq!(config.drop, vec!["APELLIDO", "TELEFONO_FIJO"]);
    }

    #[test]
    fn test_lists_have_no_duplicates() {
        // First column matches both the CORREO and CONTACTO rules
        let config = classify(&["CORREO CONTACTO", "CONTACTO"]);
        assert_eq!(config.drop, vec!["CORREO CONTACTO", "CONTACTO"]);
        let unique: HashSet<_> = config.drop.iter().collect();
        assert_eq!(unique.len(), config.drop.len());
    }

    #[test]
    fn test_usuario_matches_drop_and_hash() {
        let config = classify(&["USUARIO", "PROFESIONAL", "ENCUESTADOR"]);
        assert_eq!(config.drop, vec!["USUARIO", "PROFESIONAL"]);
        assert_eq!(config.hash, vec!["ENCUESTADOR", "USUARIO", "PROFESIONAL"]);

        assert_eq!(config.policy_for("USUARIO"), ColumnPolicy::Drop);
        assert_eq!(config.policy_for("PROFESIONAL"), ColumnPolicy::Drop);
        assert_eq!(config.policy_for("ENCUESTADOR"), ColumnPolicy::Hash);
    }

    #[test]
    fn test_case_insensitive_headers() {
        let config = classify(&["nombre", "Correo_Electronico", "observaciones"]);
        assert_eq!(config.drop, vec!["nombre", "Correo_Electronico"]);
        assert_eq!(config.freetext, vec!["observaciones"]);
    }

    #[test]
    fn test_policy_for_unmatched_is_normalize_only() {
        let config = classify(&["EDAD", "ZONA"]);
        assert_eq!(config.policy_for("EDAD"), ColumnPolicy::NormalizeOnly);
        assert_eq!(config, PiiConfig::default());
    }

    #[test]
    fn test_freetext_and_hash_prefers_hash() {
        let config = PiiConfig {
            drop: vec![],
            hash: vec!["NOTA_ENCUESTADOR".to_string()],
            freetext: vec!["NOTA_ENCUESTADOR".to_string()],
        };
        assert_eq!(config.policy_for("NOTA_ENCUESTADOR"), ColumnPolicy::Hash);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let columns = ["NOMBRE", "USUARIO", "OTRO_CUAL", "NOTAS", "EDAD"];
        let first = classify(&columns);
        let second = classify(&columns);
        assert_eq!(first, second);
    }

    #[test]
    fn test_columns_by_category() {
        let config = classify(&["NOMBRE", "ENCUESTADOR", "COMENTARIOS"]);
        assert_eq!(config.columns(PiiCategory::Drop), ["NOMBRE"]);
        assert_eq!(config.columns(PiiCategory::Hash), ["ENCUESTADOR"]);
        assert_eq!(config.columns(PiiCategory::Freetext), ["COMENTARIOS"]);
    }

    #[test]
    fn test_pii_config_serializes_names_only() {
        let config = classify(&["NOMBRE", "ENCUESTADOR"]);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["drop"][0], "NOMBRE");
        assert_eq!(json["hash"][0], "ENCUESTADOR");
        assert!(json["freetext"].as_array().unwrap().is_empty());
    }
}
