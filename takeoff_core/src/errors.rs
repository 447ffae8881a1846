//! # Error Types
//!
//! Structured error types for takeoff_core. Every failure is a deterministic
//! function of its input, so none of these are retried automatically; the
//! variants carry enough context for a caller to fix the input (e.g. highlight
//! the exact dimension fields that failed validation).
//!
//! ## Taxonomy
//!
//! | Variant | Meaning | Recoverable |
//! |---|---|---|
//! | `Configuration` | element type missing or undefined | no |
//! | `UnknownElementType` | type name outside the supported set | no |
//! | `InvalidElement` | required dimensions missing/invalid | yes |
//! | `Calculation` | formula failure on input that passed validation | no |
//!
//! The remaining variants belong to the persistence and reporting adapters.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::elements::{Dimension, ElementType};
//! use takeoff_core::errors::{CalcError, CalcResult};
//!
//! fn require_height(height: Option<f64>) -> CalcResult<f64> {
//!     height.ok_or_else(|| {
//!         CalcError::invalid_element(ElementType::SquareColumn, vec![Dimension::Height])
//!     })
//! }
//!
//! let err = require_height(None).unwrap_err();
//! assert_eq!(err.error_code(), "INVALID_ELEMENT");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::elements::{Dimension, ElementType};

/// Result type alias for takeoff_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for estimation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Element type is absent or has no definition
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// Element type name is not one of the supported kinds
    #[error("Unknown element type: '{name}'")]
    UnknownElementType { name: String },

    /// One or more required dimensions are missing or not positive
    #[error("Invalid {element_type} element: missing or invalid {}", join_fields(.missing_fields))]
    InvalidElement {
        element_type: ElementType,
        missing_fields: Vec<Dimension>,
    },

    /// Volume or yield formula failed on an element that should have been valid
    #[error("Calculation failed: {calculation_type} - {reason}")]
    Calculation {
        calculation_type: String,
        reason: String,
    },

    /// Project is not present in the store
    #[error("Project not found: {project_id}")]
    ProjectNotFound { project_id: String },

    /// Calculation record is not present in the store
    #[error("Calculation record not found: {record_id}")]
    RecordNotFound { record_id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Report rendering failed
    #[error("Report error: {format} - {reason}")]
    ReportError { format: String, reason: String },
}

fn join_fields(fields: &[Dimension]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl CalcError {
    /// Create a Configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        CalcError::Configuration {
            reason: reason.into(),
        }
    }

    /// Create an UnknownElementType error
    pub fn unknown_element_type(name: impl Into<String>) -> Self {
        CalcError::UnknownElementType { name: name.into() }
    }

    /// Create an InvalidElement error
    pub fn invalid_element(element_type: ElementType, missing_fields: Vec<Dimension>) -> Self {
        CalcError::InvalidElement {
            element_type,
            missing_fields,
        }
    }

    /// Create a Calculation error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Calculation {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a ProjectNotFound error
    pub fn project_not_found(project_id: impl ToString) -> Self {
        CalcError::ProjectNotFound {
            project_id: project_id.to_string(),
        }
    }

    /// Create a RecordNotFound error
    pub fn record_not_found(record_id: impl ToString) -> Self {
        CalcError::RecordNotFound {
            record_id: record_id.to_string(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Create a ReportError
    pub fn report(format: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ReportError {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Check if the caller can recover by changing input or waiting.
    ///
    /// Invalid elements are fixed by the user; locked files free up.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidElement { .. } | CalcError::FileLocked { .. }
        )
    }

    /// Failing dimension fields, if this is a validation failure.
    pub fn missing_fields(&self) -> &[Dimension] {
        match self {
            CalcError::InvalidElement { missing_fields, .. } => missing_fields,
            _ => &[],
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::Configuration { .. } => "CONFIGURATION_ERROR",
            CalcError::UnknownElementType { .. } => "UNKNOWN_ELEMENT_TYPE",
            CalcError::InvalidElement { .. } => "INVALID_ELEMENT",
            CalcError::Calculation { .. } => "CALCULATION_ERROR",
            CalcError::ProjectNotFound { .. } => "PROJECT_NOT_FOUND",
            CalcError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::ReportError { .. } => "REPORT_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::serialization(e.to_string())
    }
}
