//! # Application Error Types
//!
//! This module defines the error types reported at the boundary of the
//! aggregation engine. Parsing itself never fails: lines that cannot be read
//! numerically fall back to descriptive treatment. Errors only surface when a
//! caller hands the engine input that breaks its contract, or when the
//! configuration is invalid.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Caller contract violations (malformed recipes, negative order counts, etc.)
    Validation(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        // Shape errors in caller-supplied JSON are contract violations, not internal faults
        AppError::Validation(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting
pub mod error_logging {
    use tracing::error;

    /// Log validation errors with input context
    pub fn log_validation_error(
        error: &impl std::fmt::Display,
        operation: &str,
        recipe_id: Option<&str>,
        input_type: &str,
        input_value: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            recipe_id = ?recipe_id,
            input_type = %input_type,
            input_value = ?input_value.map(truncate_for_log),
            "Validation failed"
        );
    }

    /// Log configuration errors during initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }

    fn truncate_for_log(value: &str) -> String {
        if value.chars().count() > 100 {
            format!("{}...", value.chars().take(100).collect::<String>())
        } else {
            value.to_string()
        }
    }
}
