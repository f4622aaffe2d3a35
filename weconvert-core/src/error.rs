//! Conversion errors and their structured reports
//!
//! `ConvertError` is what library code returns. `ErrorReport` is the
//! serializable shape handed to clients of the server: a machine-readable
//! code, a message and an optional suggestion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const UNKNOWN_CATEGORY: &str = "UNKNOWN_CATEGORY";
    pub const INVALID_SELECTION: &str = "INVALID_SELECTION";
    pub const INCOMPATIBLE: &str = "INCOMPATIBLE";
    pub const INVALID_VALUE: &str = "INVALID_VALUE";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
}

/// Error type for conversion operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("{unit} is not a {category} unit")]
    InvalidUnitSelection { category: String, unit: String },

    #[error("Cannot convert {from} to {to}: different categories")]
    IncompatibleCategories { from: String, to: String },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ConvertError {
    pub fn invalid_selection(category: impl Into<String>, unit: impl Into<String>) -> Self {
        ConvertError::InvalidUnitSelection {
            category: category.into(),
            unit: unit.into(),
        }
    }

    pub fn incompatible(from: impl Into<String>, to: impl Into<String>) -> Self {
        ConvertError::IncompatibleCategories {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ConvertError::UnknownUnit(_) => codes::UNKNOWN_UNIT,
            ConvertError::UnknownCategory(_) => codes::UNKNOWN_CATEGORY,
            ConvertError::InvalidUnitSelection { .. } => codes::INVALID_SELECTION,
            ConvertError::IncompatibleCategories { .. } => codes::INCOMPATIBLE,
            ConvertError::InvalidValue(_) => codes::INVALID_VALUE,
            ConvertError::ParseError(_) => codes::PARSE_ERROR,
        }
    }
}

/// Structured error for clients of the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorReport {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl From<&ConvertError> for ErrorReport {
    fn from(err: &ConvertError) -> Self {
        let report = ErrorReport::new(err.code(), err.to_string());
        match err {
            ConvertError::UnknownUnit(_) => {
                report.with_suggestion("Use list_units to see the units of a category")
            }
            ConvertError::UnknownCategory(_) => {
                report.with_suggestion("Valid categories: Temperature, Length, Time, Volume")
            }
            ConvertError::InvalidUnitSelection { category, .. } => {
                report.with_suggestion(format!("Pick one of the {} units", category))
            }
            ConvertError::IncompatibleCategories { .. } => {
                report.with_suggestion("Both units must belong to the same category")
            }
            ConvertError::InvalidValue(_) => report.with_suggestion("Enter a finite decimal number"),
            ConvertError::ParseError(_) => {
                report.with_suggestion("Write conversions as \"from->to\", e.g. \"km->mi\"")
            }
        }
    }
}

impl From<ConvertError> for ErrorReport {
    fn from(err: ConvertError) -> Self {
        ErrorReport::from(&err)
    }
}
