//! Error types for the grid engine.

use thiserror::Error;

/// Errors surfaced by the grid engine.
///
/// Numeric edge cases in drags and spacing edits are clamped rather than
/// reported; only input the engine cannot represent ends up here.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("Invalid {field}: {value}")]
    Validation { field: &'static str, value: f64 },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;
