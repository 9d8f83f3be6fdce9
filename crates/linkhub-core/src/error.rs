//! Import/export error handling
//!
//! Fatal errors of an import or export run. Per-record problems are not
//! errors here; they are collected as [`crate::report::ImportError`] values.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::api::ApiError;
use crate::formats::Format;

/// Errors that abort an import or export before it completes
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// File extension not recognised and no format given
    #[error("Cannot detect the format of '{path}'. Pass --format json, html or csv.")]
    FormatRequired { path: PathBuf },

    /// Unknown format name
    #[error("Unknown format '{0}'. Expected json, html or csv.")]
    UnknownFormat(String),

    /// Failed to read the input file
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the export
    #[error("Failed to write export: {0}")]
    Write(#[from] io::Error),

    /// The file as a whole cannot be parsed in the given format
    #[error("Invalid {format} document: {details}")]
    InvalidDocument { format: Format, details: String },

    /// The remote bookmark set could not be fetched
    #[error("Failed to fetch bookmarks: {0}")]
    Api(#[from] ApiError),

    /// JSON serialization failed
    #[error("Failed to serialize bookmarks: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ExchangeError {
    pub(crate) fn invalid(format: Format, details: impl Into<String>) -> Self {
        ExchangeError::InvalidDocument {
            format,
            details: details.into(),
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            ExchangeError::Api(err) => err.recovery_suggestion(),
            ExchangeError::InvalidDocument {
                format: Format::Csv,
                ..
            } => Some("The first row must be a header naming at least a `url` column."),
            _ => None,
        }
    }
}

/// Result type for import/export operations
pub type ExchangeResult<T> = Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_required_display() {
        let err = ExchangeError::FormatRequired {
            path: PathBuf::from("bookmarks.txt"),
        };
        let msg = err.to_string();
        assert!(msg.contains("bookmarks.txt"));
        assert!(msg.contains("--format"));
    }

    #[test]
    fn test_invalid_document_display() {
        let err = ExchangeError::invalid(Format::Csv, "missing url column");
        assert_eq!(err.to_string(), "Invalid CSV document: missing url column");
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_api_error_wraps() {
        let err: ExchangeError = ApiError::NotConfigured("url".into()).into();
        assert!(err.to_string().contains("Failed to fetch bookmarks"));
        assert!(err.recovery_suggestion().is_some());
    }
}
