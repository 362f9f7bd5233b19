//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use crate::model::GridModel;
use crate::serialize;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Snapshots are kept as serialized JSON so loads go through the same import
/// path as files do.
#[derive(Default)]
pub struct MemoryStorage {
    snapshots: RwLock<HashMap<String, Vec<u8>>>,
    exports: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Previously saved SVG export.
    pub fn svg(&self, id: &str) -> Option<String> {
        self.exports.read().ok()?.get(id).cloned()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, model: &GridModel) -> StorageResult<()> {
        let json = serialize::export_json(model)?;
        self.snapshots
            .write()
            .map_err(lock_error)?
            .insert(id.to_string(), json);
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<GridModel> {
        let snapshots = self.snapshots.read().map_err(lock_error)?;
        let json = snapshots
            .get(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        Ok(serialize::import_json(json)?)
    }

    fn save_svg(&self, id: &str, svg: &str) -> StorageResult<()> {
        self.exports
            .write()
            .map_err(lock_error)?
            .insert(id.to_string(), svg.to_string());
        Ok(())
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        self.snapshots.write().map_err(lock_error)?.remove(id);
        self.exports.write().map_err(lock_error)?.remove(id);
        Ok(())
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.snapshots.read().map_err(lock_error)?.contains_key(id))
    }
}
