//! Durable snapshot storage behind a small key-value seam
//!
//! Reads deliberately degrade to "absent" so a torn or missing save can
//! never stop a game from starting; only writes surface errors.

use std::fs;
use std::io;
use std::path::PathBuf;

use rustc_hash::FxHashMap;

/// Failure writing to a store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not create store directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Key-value persistence used by `GameMode` autosave
pub trait SnapshotStore {
    /// Last bytes stored under `key`, if any
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Replace the bytes stored under `key`
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Ephemeral store for tests and throwaway sessions
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// One file per key under a root directory
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::CreateDir {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    /// File backing `key`; keys are dotted names, never paths
    fn key_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.root.join(name)
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.key_path(key)).ok()
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.key_path(key);
        fs::write(&path, bytes).map_err(|source| StoreError::Write { path, source })
    }
}
