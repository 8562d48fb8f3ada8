//! Error types for expenseweb-core
//!
//! This module provides error handling for the core expense and
//! analytics functionality, including error codes, detailed messages,
//! and suggestions surfaced through the API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Expense not found
    ExpenseNotFound,
    /// Validation error
    ValidationError,
    /// Backing store failure
    StoreError,
    /// Unauthorized access
    Unauthorized,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ExpenseNotFound => write!(f, "EXPENSE_NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::StoreError => write!(f, "STORE_ERROR"),
            ErrorCode::Unauthorized => write!(f, "UNAUTHORIZED"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// A single violated input constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Field that failed validation
    pub field: String,
    /// Human-readable message
    pub message: String,
}

impl Violation {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Violated constraints (validation errors only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Violation>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            errors: vec![],
            suggestions: vec![],
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        for violation in &self.errors {
            write!(f, "\n  {}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

/// Main error type for expenseweb-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Expense not found: {id}")]
    ExpenseNotFound { id: String },

    #[error("Validation failed")]
    ValidationError { violations: Vec<Violation> },

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[error("Unauthorized access")]
    Unauthorized,
}

impl CoreError {
    /// Build a validation error from a single violated constraint
    pub fn validation(field: &str, message: &str) -> Self {
        CoreError::ValidationError {
            violations: vec![Violation::new(field, message)],
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ExpenseNotFound { .. } => ErrorCode::ExpenseNotFound,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::StoreError { .. } => ErrorCode::StoreError,
            CoreError::Unauthorized => ErrorCode::Unauthorized,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::ExpenseNotFound { .. } => ErrorSeverity::Info,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::StoreError { .. } => ErrorSeverity::Error,
            CoreError::Unauthorized => ErrorSeverity::Warning,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::ExpenseNotFound { .. } => {
                details = details.with_suggestion(
                    "Check that the expense id is correct and belongs to you.".to_string(),
                );
            }
            CoreError::ValidationError { violations } => {
                details.errors = violations.clone();
            }
            CoreError::StoreError { .. } => {
                details.message = "Server error".to_string();
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = CoreError::ExpenseNotFound {
            id: "abc".to_string(),
        };
        assert_eq!(err.code(), ErrorCode::ExpenseNotFound);
        assert_eq!(err.severity(), ErrorSeverity::Info);
    }

    #[test]
    fn test_validation_details_carry_violations() {
        let err = CoreError::validation("monthlyBudget", "Budget must be a positive number");
        let details = err.to_details();
        assert_eq!(details.code, ErrorCode::ValidationError);
        assert_eq!(details.errors.len(), 1);
        assert_eq!(details.errors[0].field, "monthlyBudget");
    }

    #[test]
    fn test_store_error_masks_message() {
        let err = CoreError::StoreError {
            message: "connection refused".to_string(),
        };
        let details = err.to_details();
        assert_eq!(details.message, "Server error");
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }
}
