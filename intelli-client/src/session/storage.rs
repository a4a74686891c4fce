//! Durable session storage
//!
//! A small string key/value store with `localStorage` semantics. The session
//! store and the request pipeline share one instance; the pipeline reads it on
//! every request so it never needs the session store itself.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Access token key
pub const KEY_TOKEN: &str = "token";
/// Refresh token key
pub const KEY_REFRESH_TOKEN: &str = "refreshToken";
/// JSON-serialized user record key
pub const KEY_USER: &str = "user";

/// Every key the session owns
pub const SESSION_KEYS: [&str; 3] = [KEY_TOKEN, KEY_REFRESH_TOKEN, KEY_USER];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// String key/value storage that outlives the process
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every session key
    fn clear_session(&self) -> Result<(), StorageError> {
        for key in SESSION_KEYS {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// JSON file storage: `{dir}/session.json`
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join("session.json"),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn update(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let (mut entries, corrupt) = match self.load() {
            Ok(entries) => (entries, false),
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding corrupt session file");
                (BTreeMap::new(), true)
            }
            Err(e) => return Err(e),
        };
        if f(&mut entries) || corrupt {
            self.save(&entries)?;
        }
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

/// In-memory storage; clones share the same entries
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested"));

        assert_eq!(storage.get(KEY_TOKEN).unwrap(), None);
        storage.set(KEY_TOKEN, "abc").unwrap();
        storage.set(KEY_USER, r#"{"id":"1"}"#).unwrap();
        assert!(storage.path().exists());

        // A second handle sees the same file
        let reopened = FileStorage::new(temp_dir.path().join("nested"));
        assert_eq!(reopened.get(KEY_TOKEN).unwrap().as_deref(), Some("abc"));

        reopened.remove(KEY_TOKEN).unwrap();
        assert_eq!(storage.get(KEY_TOKEN).unwrap(), None);
        assert!(storage.get(KEY_USER).unwrap().is_some());
    }

    #[test]
    fn test_file_storage_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        fs::write(storage.path(), "not json").unwrap();
        assert!(matches!(storage.get(KEY_TOKEN), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_file_storage_recovers_from_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        fs::write(storage.path(), "{truncated").unwrap();

        // Clearing rewrites the file even though no key was present
        storage.clear_session().unwrap();
        assert_eq!(storage.get(KEY_TOKEN).unwrap(), None);

        fs::write(storage.path(), "{truncated").unwrap();
        storage.set(KEY_TOKEN, "fresh").unwrap();
        assert_eq!(storage.get(KEY_TOKEN).unwrap().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_clear_session_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.set(KEY_TOKEN, "t").unwrap();
        storage.set(KEY_REFRESH_TOKEN, "r").unwrap();
        storage.set("theme", "dark").unwrap();

        storage.clear_session().unwrap();
        storage.clear_session().unwrap();

        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    }
}
