//! CLI error type.

use repeatgrid_core::GridError;
use repeatgrid_core::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },
    #[error("{0}")]
    InvalidArgument(String),
}

pub type CliResult<T> = Result<T, CliError>;
