//! Validation error types.

use thiserror::Error;

/// A bootstrap configuration field failed validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("application id {value:?} must satisfy regular expression pattern {pattern:?}")]
    InvalidApplicationId {
        value: String,
        pattern: &'static str,
    },

    #[error("application version {value:?} must satisfy regular expression pattern {pattern:?}")]
    InvalidApplicationVersion {
        value: String,
        pattern: &'static str,
    },

    #[error("invalid image reference {value:?}: {reason}")]
    InvalidImageRef { value: String, reason: String },
}
