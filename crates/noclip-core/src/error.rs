//! Error types for NoClip

use thiserror::Error;

/// Core NoClip errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NoclipError {
    /// A lock duration was NaN, infinite or negative
    #[error("Invalid {field}: {value} is not a finite, non-negative duration")]
    InvalidLock { field: &'static str, value: f32 },

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for NoClip operations
pub type NoclipResult<T> = Result<T, NoclipError>;
