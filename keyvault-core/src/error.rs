//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Validation error (rejected input, nothing was stored)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl CoreError {
    /// Whether it is expected behavior (bad user input) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ValidationError(_) => true,
            Self::SerializationError(_) | Self::StorageError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn validation_errors_are_expected() {
        assert!(CoreError::ValidationError("name is required".into()).is_expected());
        assert!(!CoreError::StorageError("disk full".into()).is_expected());
        assert!(!CoreError::SerializationError("bad json".into()).is_expected());
    }

    #[test]
    fn serializes_with_code_and_details() {
        let json = serde_json::to_value(CoreError::StorageError("locked".into())).unwrap();
        assert_eq!(json["code"], "StorageError");
        assert_eq!(json["details"], "locked");
    }
}
