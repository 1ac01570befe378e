//! Error types for the profiling pipeline.
//!
//! Error messages carry paths, column names and counts. They never carry
//! cell values, so an error surfaced from a stage that ran before
//! anonymization cannot leak the data it was processing.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for SafeProfile operations.
///
/// # Privacy
/// Variants hold file paths, column names and library error sources only.
/// Cell contents are never formatted into a message.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Input path does not exist
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// Input extension is neither a spreadsheet nor delimited text
    #[error("Unsupported file type '.{extension}' for {}. Use .csv or .xlsx", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Input could not be decoded
    #[error("Failed to parse input: {context}")]
    Parse {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Chart rendering failed
    #[error("Chart rendering failed: {context}")]
    Render {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Convenience type alias for Results with ProfileError
pub type Result<T> = std::result::Result<T, ProfileError>;

impl ProfileError {
    /// Creates an input-not-found error
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    /// Creates an unsupported-format error for the given path
    pub fn unsupported_format(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        Self::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        }
    }

    /// Creates a parse error with context
    pub fn parse_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Parse {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error mentioning the path involved
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Creates a render error with context
    pub fn render_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Render {
            context: context.into(),
            source: Box::new(error),
        }
    }
}

impl From<csv::Error> for ProfileError {
    fn from(error: csv::Error) -> Self {
        // csv::Error::Io is a write or read failure on the file, not a format issue
        if error.is_io_error() {
            match error.into_kind() {
                csv::ErrorKind::Io(source) => Self::io("CSV I/O", source),
                other => Self::configuration(format!("Unexpected CSV error kind: {other:?}")),
            }
        } else {
            Self::parse_failed("CSV", error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_not_found_message() {
        let error = ProfileError::input_not_found("/tmp/missing.csv");
        assert_eq!(
            error.to_string(),
            "Input file not found: /tmp/missing.csv"
        );
    }

    #[test]
    fn test_unsupported_format_extracts_extension() {
        let error = ProfileError::unsupported_format(Path::new("data/base.parquet"));
        match &error {
            ProfileError::UnsupportedFormat { extension, .. } => assert_eq!(extension, "parquet"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(error.to_string().contains(".parquet"));
    }

    #[test]
    fn test_unsupported_format_without_extension() {
        let error = ProfileError::unsupported_format(Path::new("README"));
        assert!(matches!(
            error,
            ProfileError::UnsupportedFormat { ref extension, .. } if extension.is_empty()
        ));
    }

    #[test]
    fn test_error_creation() {
        let error = ProfileError::configuration("const_threshold must be in (0, 1]");
        assert!(error.to_string().contains("const_threshold"));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = ProfileError::io("Failed to write reports/a.csv", io);
        assert!(error.to_string().contains("reports/a.csv"));
    }
}
