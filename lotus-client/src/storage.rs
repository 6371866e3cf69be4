//! Session storage
//!
//! Key/value persistence for the session blob. `FileStorage` keeps one
//! `<key>.json` file per key in a directory; `MemoryStorage` keeps values
//! in-process.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Durable client storage for string values
pub trait SessionStorage: Send + Sync {
    /// Read a value; `Ok(None)` if the key is absent
    fn load(&self, key: &str) -> io::Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn save(&self, key: &str, value: &str) -> io::Result<()>;

    /// Remove a value; absent keys are not an error
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// File-backed storage
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SessionStorage for FileStorage {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> io::Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

impl<S: SessionStorage + ?Sized> SessionStorage for std::sync::Arc<S> {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> io::Result<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("state"));

        assert_eq!(storage.load("pos_session").unwrap(), None);

        storage.save("pos_session", r#"{"a":1}"#).unwrap();
        assert!(storage.path_for("pos_session").exists());
        assert_eq!(storage.load("pos_session").unwrap().as_deref(), Some(r#"{"a":1}"#));

        storage.remove("pos_session").unwrap();
        assert_eq!(storage.load("pos_session").unwrap(), None);
        // Removing twice is fine
        storage.remove("pos_session").unwrap();
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        storage.save("k", "v").unwrap();
        assert!(storage.contains("k"));
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert!(!storage.contains("k"));
    }
}
