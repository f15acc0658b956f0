use error_stack::{Result, ResultExt};
use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Failed to access session storage")]
pub struct StorageError;

/// Where a [`Session`](super::Session) keeps the signed in user between runs.
pub trait SessionStorage: Debug + Send + Sync {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, data: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Keeps the session in a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error)
                .change_context(StorageError)
                .attach_printable_lazy(|| format!("path: {}", self.path.display())),
        }
    }

    fn save(&self, data: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .change_context(StorageError)
                .attach_printable_lazy(|| format!("path: {}", parent.display()))?;
        }

        std::fs::write(&self.path, data)
            .change_context(StorageError)
            .attach_printable_lazy(|| format!("path: {}", self.path.display()))
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Err(error) if error.kind() != ErrorKind::NotFound => Err(error)
                .change_context(StorageError)
                .attach_printable_lazy(|| format!("path: {}", self.path.display())),
            _ => Ok(()),
        }
    }
}

/// Keeps the session in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(data.into()))),
        }
    }

    #[must_use]
    pub fn data(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, data: Option<String>) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = data;
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.data())
    }

    fn save(&self, data: &str) -> Result<(), StorageError> {
        self.set(Some(data.to_string()));
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.set(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage() {
        let dir = std::env::temp_dir().join(format!(
            "scribe-session-{}",
            random_string::generate(12, "abcdefghijklmnopqrstuvwxyz")
        ));
        let storage = FileStorage::new(dir.join("nested").join("session.json"));

        assert_eq!(storage.load().unwrap(), None);
        storage.save("{}").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("{}"));

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        // clearing twice is fine
        storage.clear().unwrap();

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_memory_storage_clones_share_data() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.save("hello").unwrap();
        assert_eq!(other.data().as_deref(), Some("hello"));
        other.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }
}
