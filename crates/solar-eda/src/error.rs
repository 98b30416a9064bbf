//! Error types for loading and analyzing sensor logs.
//!
//! Errors are serializable so a presentation layer can show them to the user
//! as a `{code, message}` pair.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the EDA library.
#[derive(Error, Debug)]
pub enum EdaError {
    /// The uploaded file is neither delimited text nor a spreadsheet.
    #[error("Unsupported file format: '{0}' (expected .csv or a spreadsheet)")]
    UnsupportedFormat(String),

    /// The input contains no header row or no columns.
    #[error("Dataset is empty: {0}")]
    EmptyDataset(String),

    /// The requested worksheet does not exist in the workbook.
    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] crate::config::ConfigValidationError),

    /// A section failed to compute.
    #[error("Analysis '{section}' failed: {reason}")]
    AnalysisFailed { section: String, reason: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Spreadsheet reader error wrapper.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EdaError>,
    },
}

impl EdaError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EdaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for the presentation layer.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::EmptyDataset(_) => "EMPTY_DATASET",
            Self::SheetNotFound(_) => "SHEET_NOT_FOUND",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::AnalysisFailed { .. } => "ANALYSIS_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Spreadsheet(_) => "SPREADSHEET_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error came from the input file rather than from the library.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::UnsupportedFormat(_)
            | Self::EmptyDataset(_)
            | Self::SheetNotFound(_)
            | Self::Spreadsheet(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

impl Serialize for EdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EdaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for EDA operations.
pub type Result<T> = std::result::Result<T, EdaError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            EdaError::UnsupportedFormat("pdf".to_string()).error_code(),
            "UNSUPPORTED_FORMAT"
        );
        assert_eq!(
            EdaError::ColumnNotFound("ghi".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_is_input_error() {
        assert!(EdaError::UnsupportedFormat("pdf".to_string()).is_input_error());
        assert!(EdaError::EmptyDataset("no header".to_string()).is_input_error());
        assert!(!EdaError::ColumnNotFound("ghi".to_string()).is_input_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = EdaError::UnsupportedFormat("report.pdf".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("UNSUPPORTED_FORMAT"));
        assert!(json.contains("report.pdf"));
    }

    #[test]
    fn test_with_context() {
        let error = EdaError::UnsupportedFormat("pdf".to_string()).with_context("Loading upload");
        assert!(error.to_string().contains("Loading upload"));
        assert_eq!(error.error_code(), "UNSUPPORTED_FORMAT");
        assert!(error.is_input_error());
    }
}
