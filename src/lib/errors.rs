//! Custom error types for pairclass operations.

use thiserror::Error;

/// Result type alias for pairclass operations
pub type Result<T> = std::result::Result<T, PairClassError>;

/// Error type for pairclass operations
#[derive(Error, Debug)]
pub enum PairClassError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "BAM")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },
}
