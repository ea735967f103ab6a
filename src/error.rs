//! Error types for the apex-values library
//!
//! This module provides the main error and result types used throughout the library.
//! All errors use the `thiserror` crate for automatic trait implementations.
//!
//! Every error is fatal to the call that produced it: the container never
//! retries and never defaults silently. `Values::exists` suppresses only the
//! missing-key case; type and shape errors are always surfaced.

use crate::values::Key;
use thiserror::Error;

/// Main result type used throughout the apex-values library
pub type ValuesResult<T> = Result<T, ValuesError>;

/// Main error type for the apex-values library
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuesError {
    /// `insert` called with a key that is already present
    #[error("Attempting to insert key {0}, which already exists in the container")]
    DuplicateKey(Key),

    /// `at`, `update`, or `erase` referenced an absent key
    #[error("Operation '{operation}' requested key {key}, which does not exist in the container")]
    KeyDoesNotExist {
        operation: &'static str,
        key: Key,
    },

    /// A typed access whose requested type does not match the stored type
    #[error("Attempting to retrieve key {key} as type '{requested}', but the stored value has type '{stored}'")]
    IncorrectType {
        key: Key,
        stored: &'static str,
        requested: &'static str,
    },

    /// A fixed-size numeric array request against stored dynamic-size data of another shape
    #[error("Requested a fixed {expected_rows}x{expected_cols} array, but the stored value is {actual_rows}x{actual_cols}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    /// A whole-container tangent vector whose length does not match the container dimension
    #[error("Tangent vector has length {actual}, but the container dimension is {expected}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_display() {
        let error = ValuesError::DuplicateKey(7);
        assert_eq!(
            error.to_string(),
            "Attempting to insert key 7, which already exists in the container"
        );
    }

    #[test]
    fn test_key_does_not_exist_display() {
        let error = ValuesError::KeyDoesNotExist {
            operation: "at",
            key: 42,
        };
        assert_eq!(
            error.to_string(),
            "Operation 'at' requested key 42, which does not exist in the container"
        );
    }

    #[test]
    fn test_incorrect_type_display() {
        let error = ValuesError::IncorrectType {
            key: 3,
            stored: "SO3",
            requested: "SE3",
        };
        assert!(error.to_string().contains("'SE3'"));
        assert!(error.to_string().contains("'SO3'"));
    }

    #[test]
    fn test_shape_mismatch_display() {
        let error = ValuesError::ShapeMismatch {
            expected_rows: 4,
            expected_cols: 1,
            actual_rows: 3,
            actual_cols: 1,
        };
        assert_eq!(
            error.to_string(),
            "Requested a fixed 4x1 array, but the stored value is 3x1"
        );
    }
}
