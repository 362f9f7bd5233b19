//! Storage abstraction for grid documents.
//!
//! A document is one JSON snapshot, optionally accompanied by its SVG export.

mod file;
mod memory;

pub use file::{FileStorage, load_document, save_document, save_svg_document};
pub use memory::MemoryStorage;

use crate::error::GridError;
use crate::model::GridModel;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] GridError),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for grid document storage backends.
pub trait Storage: Send + Sync {
    /// Save a grid as a JSON snapshot.
    fn save(&self, id: &str, model: &GridModel) -> StorageResult<()>;

    /// Load a grid snapshot.
    fn load(&self, id: &str) -> StorageResult<GridModel>;

    /// Save the SVG export alongside the snapshot.
    fn save_svg(&self, id: &str, svg: &str) -> StorageResult<()>;

    /// Delete a document and its export.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// Check if a snapshot exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}
