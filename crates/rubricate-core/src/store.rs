//! Key/value store backends.
//!
//! [`FileStore`] keeps every key in one JSON object on disk and rewrites it
//! atomically on each mutation. [`MemoryStore`] is used by tests and can
//! emulate a storage quota or disabled storage.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::traits::KeyValueStore;

/// Name of the backing file inside the state directory.
pub const STORE_FILE: &str = "store.json";

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
    disabled: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would push the total size (keys + values) above
    /// `bytes`.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    /// Every operation fails with [`StoreError::Unavailable`].
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn check_enabled(&self) -> Result<(), StoreError> {
        if self.disabled {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_enabled()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_enabled()?;
        if let Some(quota) = self.quota_bytes {
            let previous = self.entries.get(key).map(|v| key.len() + v.len());
            let needed = self.used_bytes() - previous.unwrap_or(0) + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.check_enabled()?;
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.check_enabled()?;
        Ok(self.entries.keys().cloned().collect())
    }
}

/// File-backed store: `<dir>/store.json`, one JSON object of string values.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating the directory if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let path = self.path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))
    }

    /// Like `read`, but a corrupt file is treated as empty so that the next
    /// write replaces it.
    fn read_for_write(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match self.read() {
            Err(StoreError::Corrupt(reason)) => {
                tracing::warn!("discarding corrupt store: {reason}");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(self.path()).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.read_for_write()?;
        if entries.remove(key).is_some() {
            self.write(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read()?.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_basics() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
        store.remove("a").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["b"]);
    }

    #[test]
    fn memory_store_quota() {
        let mut store = MemoryStore::new().with_quota(10);
        store.set("k", "12345").unwrap();
        // overwriting the same key only counts the new value
        store.set("k", "123456789").unwrap();
        let err = store.set("k2", "x").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { quota: 10, .. }));
    }

    #[test]
    fn disabled_store_fails_everything() {
        let mut store = MemoryStore::disabled();
        assert!(matches!(store.get("a"), Err(StoreError::Unavailable)));
        assert!(matches!(store.set("a", "1"), Err(StoreError::Unavailable)));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("state")).unwrap();
        store.set("ns.selection", "{\"x\":1}").unwrap();

        let reopened = FileStore::open(dir.path().join("state")).unwrap();
        assert_eq!(
            reopened.get("ns.selection").unwrap().as_deref(),
            Some("{\"x\":1}")
        );
        assert_eq!(reopened.keys().unwrap(), vec!["ns.selection"]);
    }

    #[test]
    fn file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        std::fs::write(store.path(), "not json").unwrap();

        assert!(matches!(store.get("a"), Err(StoreError::Corrupt(_))));
        // a write replaces the corrupt file
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }
}
