//! Salted identifier hashing.

use sha2::{Digest, Sha256};

/// Salt used when none is configured.
pub const DEFAULT_SALT: &str = "secure_salt_v1";

/// Number of hex characters kept from each digest.
pub const DEFAULT_PREFIX_LEN: usize = 12;

/// Hashing parameters for the anonymizer.
///
/// The salt is a secret of the run; it is never logged or written out.
#[derive(Clone, PartialEq, Eq)]
pub struct AnonymizerConfig {
    /// Prepended to each value before hashing
    pub salt: String,
    /// Hex characters kept from the digest (at most 64)
    pub prefix_len: usize,
}

impl std::fmt::Debug for AnonymizerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnonymizerConfig")
            .field("salt", &"<redacted>")
            .field("prefix_len", &self.prefix_len)
            .finish()
    }
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SALT.to_string(),
            prefix_len: DEFAULT_PREFIX_LEN,
        }
    }
}

impl AnonymizerConfig {
    /// Creates a configuration with the given salt and default prefix length.
    pub fn with_salt(salt: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            ..Self::default()
        }
    }

    /// Hashes one value with this configuration.
    pub fn hash(&self, value: Option<&str>) -> String {
        hash_with_prefix(value, &self.salt, self.prefix_len)
    }
}

/// Salted SHA-256 digest of a value, truncated to 12 hex characters.
///
/// Missing and whitespace-only values hash to the empty string.
///
/// ```rust
/// use safeprofile_core::pii::hash_value;
///
/// let a = hash_value(Some("ENC-001"), "s");
/// assert_eq!(a.len(), 12);
/// assert_eq!(a, hash_value(Some("ENC-001"), "s"));
/// assert_eq!(hash_value(Some("   "), "s"), "");
/// ```
pub fn hash_value(value: Option<&str>, salt: &str) -> String {
    hash_with_prefix(value, salt, DEFAULT_PREFIX_LEN)
}

fn hash_with_prefix(value: Option<&str>, salt: &str, prefix_len: usize) -> String {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return String::new();
    };

    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(value.as_bytes());
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(prefix_len);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        let full = hex::encode(Sha256::digest(b"saltvalue"));
        assert_eq!(hash_value(Some("value"), "salt"), full[..12]);
    }

    #[test]
    fn test_hash_is_lowercase_hex() {
        let h = hash_value(Some("Juan"), DEFAULT_SALT);
        assert_eq!(h.len(), 12);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_salt_changes_digest() {
        assert_ne!(hash_value(Some("Juan"), "a"), hash_value(Some("Juan"), "b"));
    }

    #[test]
    fn test_missing_and_blank_values() {
        assert_eq!(hash_value(None, DEFAULT_SALT), "");
        assert_eq!(hash_value(Some(""), DEFAULT_SALT), "");
        assert_eq!(hash_value(Some(" \t "), DEFAULT_SALT), "");
    }

    #[test]
    fn test_value_is_hashed_untrimmed() {
        assert_ne!(hash_value(Some(" Juan"), "s"), hash_value(Some("Juan"), "s"));
    }

    #[test]
    fn test_config_defaults_and_prefix() {
        let config = AnonymizerConfig::default();
        assert_eq!(config.salt, DEFAULT_SALT);
        assert_eq!(config.hash(Some("x")), hash_value(Some("x"), DEFAULT_SALT));

        let long = AnonymizerConfig {
            prefix_len: 64,
            ..AnonymizerConfig::with_salt("s")
        };
        assert_eq!(long.hash(Some("x")).len(), 64);
    }

    #[test]
    fn test_debug_hides_salt() {
        let config = AnonymizerConfig::with_salt("top-secret");
        assert!(!format!("{config:?}").contains("top-secret"));
    }
}
