//! File-backed key/value storage
//!
//! Stores key-value pairs in a JSON file at:
//! - Linux: ~/.config/sheetkeep/storage.json
//! - macOS: ~/Library/Application Support/io.sheetkeep.sheetkeep/storage.json
//! - Windows: C:\Users\<User>\AppData\Roaming\sheetkeep\sheetkeep\config\storage.json

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use directories::ProjectDirs;

use crate::ports::outbound::{KeyValueStore, StoreError};

const STORAGE_FILE: &str = "storage.json";

#[derive(Clone)]
pub struct FileKeyValueStore {
    storage_path: PathBuf,
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for FileKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileKeyValueStore {
    /// Opens the store in the platform config directory.
    pub fn new() -> Self {
        Self::with_path(default_storage_path())
    }

    /// Opens the store at an explicit file path.
    ///
    /// A missing file is an empty store; an unreadable one is logged and
    /// treated as empty.
    pub fn with_path(storage_path: impl Into<PathBuf>) -> Self {
        let storage_path = storage_path.into();
        let cache = read_map(&storage_path);

        tracing::debug!(path = ?storage_path, entries = cache.len(), "File storage opened");

        Self {
            storage_path,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Writes `entries` to disk. The cache is only updated by callers once
    /// this succeeds.
    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::backend("persist", e))?;
        }

        let data = serde_json::to_string_pretty(entries)?;
        fs::write(&self.storage_path, data).map_err(|e| StoreError::backend("persist", e))
    }
}

/// The platform config location, or the working directory when no home
/// directory is known.
pub fn default_storage_path() -> PathBuf {
    ProjectDirs::from("io", "sheetkeep", "sheetkeep")
        .map(|dirs| dirs.config_dir().join(STORAGE_FILE))
        .unwrap_or_else(|| PathBuf::from("sheetkeep_storage.json"))
}

fn read_map(path: &Path) -> HashMap<String, String> {
    if !path.exists() {
        return HashMap::new();
    }
    match fs::read_to_string(path) {
        Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
            tracing::warn!(path = ?path, error = %e, "Failed to parse storage file");
            HashMap::new()
        }),
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Failed to read storage file");
            HashMap::new()
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self
            .cache
            .write()
            .map_err(|e| StoreError::backend("save", e))?;

        let mut next = guard.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self
            .cache
            .read()
            .map_err(|e| StoreError::backend("load", e))?;
        Ok(guard.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut guard = self
            .cache
            .write()
            .map_err(|e| StoreError::backend("remove", e))?;
        if !guard.contains_key(key) {
            return Ok(());
        }

        let mut next = guard.clone();
        next.remove(key);
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileKeyValueStore::with_path(&path);
        store.save("dndCharacter", r#"{"name":"Ayla"}"#).unwrap();
        store.save("other", "x").unwrap();
        store.remove("other").unwrap();

        let reopened = FileKeyValueStore::with_path(&path);
        assert_eq!(
            reopened.load("dndCharacter").unwrap().as_deref(),
            Some(r#"{"name":"Ayla"}"#)
        );
        assert_eq!(reopened.load("other").unwrap(), None);
    }

    #[test]
    fn failed_write_leaves_the_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the parent directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let store = FileKeyValueStore::with_path(blocker.join("storage.json"));
        assert!(store.save("dndCharacter", r#"{"name":"X"}"#).is_err());
        assert_eq!(store.load("dndCharacter").unwrap(), None);

        let cached = FileKeyValueStore {
            storage_path: blocker.join("storage.json"),
            cache: Arc::new(RwLock::new(HashMap::from([(
                "kept".to_string(),
                "old".to_string(),
            )]))),
        };
        assert!(cached.save("kept", "new").is_err());
        assert!(cached.remove("kept").is_err());
        assert_eq!(cached.load("kept").unwrap().as_deref(), Some("old"));
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let store = FileKeyValueStore::with_path(&path);
        assert_eq!(store.load("anything").unwrap(), None);
        store.save("k", "v").unwrap();
        assert_eq!(FileKeyValueStore::with_path(&path).load("k").unwrap().as_deref(), Some("v"));
    }
}
