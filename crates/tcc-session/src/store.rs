//! Key-value stores the campaign document is persisted to.
//!
//! A store holds string values under string keys, like browser local
//! storage. [`FileStore`] keeps them in one JSON object on disk;
//! [`MemoryStore`] keeps them in memory for tests and throwaway sessions.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{StoreError, StoreResult};

/// A string-keyed store of string values.
pub trait KeyValueStore {
    /// Read the value under `key`, if any.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove the value under `key`. Removing a missing key succeeds.
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

/// In-memory store. Nothing survives the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(key.into(), value.into());
        Self { entries }
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed store: a pretty-printed JSON object of key to string.
///
/// Default location:
/// - Linux: ~/.config/tcc/store.json
/// - macOS: ~/Library/Application Support/org.tabletop.tcc/store.json
/// - Windows: C:\Users\<User>\AppData\Roaming\tabletop\tcc\config\store.json
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    cache: BTreeMap<String, String>,
}

impl FileStore {
    /// The platform default store file, or `tcc_store.json` in the working
    /// directory if no home directory is known.
    pub fn default_path() -> PathBuf {
        match ProjectDirs::from("org", "tabletop", "tcc") {
            Some(dirs) => dirs.config_dir().join("store.json"),
            None => PathBuf::from("tcc_store.json"),
        }
    }

    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// logged and treated as empty; it is overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(data) => match serde_json::from_str::<BTreeMap<String, String>>(&data) {
                    Ok(map) => map,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), "failed to parse storage file: {e}");
                        BTreeMap::new()
                    }
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), "failed to read storage file: {e}");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), keys = cache.len(), "file store opened");
        Self { path, cache }
    }

    /// Open the store at [`FileStore::default_path`].
    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> StoreResult<()> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_string_pretty(&self.cache)?;
        fs::write(&self.path, data).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.cache.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.cache.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        if self.cache.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
