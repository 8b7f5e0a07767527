//! Error types for breeding-results
//!
//! Every failure surfaces to the immediate caller. Nothing in the crate logs an
//! error and carries on.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// breeding-results error types
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied arguments that can never succeed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Predictions and ground truth differ in length
    #[error("Shape mismatch: ground truth has {expected} values, predictions have {actual}")]
    ShapeMismatch {
        /// Length of the ground-truth sequence
        expected: usize,
        /// Length of the prediction sequence
        actual: usize,
    },

    /// Model configuration rejected at construction
    #[error("Invalid model configuration: {0}")]
    InvalidConfig(String),

    /// A results table lacks a column the operation depends on
    #[error("Missing column '{0}' in results table")]
    MissingColumn(String),

    /// A serialized run configuration could not be decoded
    #[error("Malformed config in data row {row}: {message}\nThe results file was not partially parsed.")]
    ConfigDecode {
        /// 0-based data row (header excluded)
        row: usize,
        /// Decoder message
        message: String,
    },

    /// An input data file is malformed
    #[error("Malformed data file '{file}': {message}")]
    InvalidData {
        /// Offending file
        file: String,
        /// What is wrong with it
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
