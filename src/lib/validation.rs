//! Input validation utilities
//!
//! Common validation functions for command-line parameters and file paths
//! with consistent error messages, built on the structured error types from
//! [`crate::errors`].

use crate::errors::{PairClassError, Result};
use std::fmt::Display;
use std::path::Path;

/// Validate that a file exists
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use pairclass_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/file.bam", "Input file");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(PairClassError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that a value is strictly positive
///
/// # Errors
/// Returns an error if the value is not greater than the type's default
pub fn validate_positive<T: Ord + Display + Default>(value: T, name: &str) -> Result<()> {
    if value <= T::default() {
        return Err(PairClassError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("must be positive, got {value}"),
        });
    }
    Ok(())
}

/// Validate that a value falls within an inclusive range
///
/// # Errors
/// Returns an error if the value is outside `[min, max]`
pub fn validate_min_max<T: Ord + Display>(value: T, min: T, max: T, name: &str) -> Result<()> {
    if value < min || value > max {
        return Err(PairClassError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("must be between {min} and {max}, got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_exists() {
        assert!(validate_file_exists("/nonexistent/file.bam", "Input BAM").is_err());
        assert!(validate_file_exists("/", "Root").is_ok());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(1u64, "distance").is_ok());
        let err = validate_positive(0u64, "distance").unwrap_err();
        assert!(err.to_string().contains("Invalid parameter 'distance'"));
    }

    #[test]
    fn test_validate_min_max() {
        assert!(validate_min_max(50u8, 0, 100, "deviation").is_ok());
        assert!(validate_min_max(0u8, 0, 100, "deviation").is_ok());
        let err = validate_min_max(101u8, 0, 100, "deviation").unwrap_err();
        assert!(err.to_string().contains("between 0 and 100"));
    }
}
