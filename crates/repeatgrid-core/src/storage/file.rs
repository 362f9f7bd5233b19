//! File-based storage implementation.

use super::{Storage, StorageError, StorageResult};
use crate::model::GridModel;
use crate::serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each grid as `<id>.json` with its export as `<id>.svg`.
pub struct FileStorage {
    /// Base directory for document storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Get the snapshot path for a document ID.
    pub fn document_path(&self, id: &str) -> PathBuf {
        self.path_with_extension(id, "json")
    }

    /// Get the SVG export path for a document ID.
    pub fn svg_path(&self, id: &str) -> PathBuf {
        self.path_with_extension(id, "svg")
    }

    fn path_with_extension(&self, id: &str, extension: &str) -> PathBuf {
        // Sanitize ID to be safe for filenames
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.{}", safe_id, extension))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Write `model` as a JSON snapshot to exactly `path`.
pub fn save_document(path: &Path, model: &GridModel) -> StorageResult<()> {
    let json = serialize::export_json(model)?;
    fs::write(path, json)
        .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    log::info!("Saved grid to {}", path.display());
    Ok(())
}

/// Read the JSON snapshot at exactly `path`.
pub fn load_document(path: &Path) -> StorageResult<GridModel> {
    if !path.exists() {
        return Err(StorageError::NotFound(path.display().to_string()));
    }

    let json = fs::read(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let model = serialize::import_json(&json)?;
    log::info!("Loaded grid from {}", path.display());
    Ok(model)
}

/// Write an SVG export to exactly `path`.
pub fn save_svg_document(path: &Path, svg: &str) -> StorageResult<()> {
    fs::write(path, svg)
        .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    log::info!("Exported SVG to {}", path.display());
    Ok(())
}

impl Storage for FileStorage {
    fn save(&self, id: &str, model: &GridModel) -> StorageResult<()> {
        save_document(&self.document_path(id), model)
    }

    fn load(&self, id: &str) -> StorageResult<GridModel> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        load_document(&path)
    }

    fn save_svg(&self, id: &str, svg: &str) -> StorageResult<()> {
        save_svg_document(&self.svg_path(id), svg)
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        for path in [self.document_path(id), self.svg_path(id)] {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
        }
        Ok(())
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.document_path(id).exists())
    }
}
