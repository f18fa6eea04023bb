//! Durable key/value storage
//!
//! The session store only needs string get/set/remove, which is exactly what
//! `window.localStorage` offers. Native builds persist to a JSON file.

use std::collections::HashMap;
use std::sync::Mutex;

use super::error::{SessionError, SessionResult};

/// Durable string key/value storage
pub trait DurableStorage: Send + Sync {
    fn get(&self, key: &str) -> SessionResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> SessionResult<()>;

    fn remove(&self, key: &str) -> SessionResult<()>;
}

/// In-process storage, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> SessionResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| SessionError::Lock(e.to_string()))
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SessionResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use super::DurableStorage;
    use crate::session::error::{SessionError, SessionResult};

    /// Key/value pairs kept in a single JSON document on disk
    ///
    /// Every write rewrites the whole document through a temporary file and a
    /// rename, so a crash never leaves a half-written file behind.
    #[derive(Debug)]
    pub struct FileStorage {
        path: PathBuf,
        write_lock: Mutex<()>,
    }

    impl FileStorage {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self {
                path: path.into(),
                write_lock: Mutex::new(()),
            }
        }

        /// Storage file `session.json` inside `dir`
        pub fn in_dir(dir: impl AsRef<Path>) -> Self {
            Self::new(dir.as_ref().join("session.json"))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_all(&self) -> SessionResult<BTreeMap<String, String>> {
            match std::fs::read_to_string(&self.path) {
                Ok(content) => Ok(serde_json::from_str(&content)?),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
                Err(e) => Err(e.into()),
            }
        }

        fn write_all(&self, entries: &BTreeMap<String, String>) -> SessionResult<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let tmp = self.path.with_extension("json.tmp");
            std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
            std::fs::rename(&tmp, &self.path)?;
            Ok(())
        }

        fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> SessionResult<()> {
            let _guard = self
                .write_lock
                .lock()
                .map_err(|e| SessionError::Lock(e.to_string()))?;

            let mut entries = match self.read_all() {
                Ok(entries) => entries,
                Err(SessionError::Serialization(e)) => {
                    tracing::warn!("Discarding unreadable session file {:?}: {}", self.path, e);
                    BTreeMap::new()
                }
                Err(e) => return Err(e),
            };
            f(&mut entries);
            self.write_all(&entries)
        }
    }

    impl DurableStorage for FileStorage {
        fn get(&self, key: &str) -> SessionResult<Option<String>> {
            Ok(self.read_all()?.get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> SessionResult<()> {
            self.modify(|entries| {
                entries.insert(key.to_string(), value.to_string());
            })
        }

        fn remove(&self, key: &str) -> SessionResult<()> {
            self.modify(|entries| {
                entries.remove(key);
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("user").unwrap(), None);

        storage.set("user", "{}").unwrap();
        assert_eq!(storage.get("user").unwrap().as_deref(), Some("{}"));

        storage.remove("user").unwrap();
        assert_eq!(storage.get("user").unwrap(), None);
    }

    #[test]
    fn test_file_storage_persists() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path().join("nested"));
        storage.set("isLoggedIn", "true").unwrap();

        let reopened = FileStorage::in_dir(dir.path().join("nested"));
        assert_eq!(reopened.get("isLoggedIn").unwrap().as_deref(), Some("true"));

        reopened.remove("isLoggedIn").unwrap();
        assert_eq!(storage.get("isLoggedIn").unwrap(), None);
    }

    #[test]
    fn test_file_storage_recovers_from_garbage() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        std::fs::write(storage.path(), "not json").unwrap();

        assert!(storage.get("user").is_err());

        storage.set("user", "{\"id\":1}").unwrap();
        assert_eq!(storage.get("user").unwrap().as_deref(), Some("{\"id\":1}"));
    }
}
