// Good News client-local storage
// A small persistent key/value map, the native counterpart of a page's local storage.
// Entries are stored as a flat JSON object and written through on every change.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::platform;
use crate::types::errors::StoreError;

/// Trait defining the client-local storage interface.
pub trait LocalStoreTrait {
    fn get(&self, key: &str) -> Option<&str>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
    fn path(&self) -> &Path;
}

/// JSON-file backed store.
pub struct LocalStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// Opens the store at `path_override`, or `local_storage.json` in the platform data dir.
    ///
    /// A missing file is an empty store; a malformed one is an error.
    pub fn open(path_override: Option<PathBuf>) -> Result<Self, StoreError> {
        let path = path_override.unwrap_or_else(|| platform::get_data_dir().join("local_storage.json"));

        let entries = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| StoreError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
            serde_json::from_str(&content).map_err(|e| {
                StoreError::SerializationError(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::IoError(format!("Failed to create store directory: {}", e)))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        fs::write(&self.path, json)
            .map_err(|e| StoreError::IoError(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}

impl LocalStoreTrait for LocalStore {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
