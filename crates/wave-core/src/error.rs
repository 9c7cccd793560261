//! Error types for waveform operations
//!
//! Provides a unified error type for all wave-* crates.

use thiserror::Error;

/// Core error type for waveform operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} buffers, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Buffers with different sampling rates cannot be merged
    #[error("Incompatible sampling rates: expected {expected} Hz, got {actual} Hz")]
    IncompatibleRate { expected: f64, actual: f64 },

    /// Binary input whose declared layout does not match its length
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Data type tag that does not fit the two-character field
    #[error("Invalid data type tag: {0:?}")]
    InvalidDataType(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for an empty buffer list
    pub fn empty_input() -> Self {
        Self::InsufficientData {
            expected: 1,
            actual: 0,
        }
    }

    /// Create an error for a sampling rate mismatch
    pub fn rate_mismatch(expected: f64, actual: f64) -> Self {
        Self::IncompatibleRate { expected, actual }
    }

    /// Create an error for a truncated or inconsistent byte layout
    pub fn malformed(context: impl Into<String>) -> Self {
        Self::MalformedEncoding(context.into())
    }
}
