//! JSON-file-backed watched store.

use std::fs;
use std::path::{Path, PathBuf};

use super::{WatchedEntry, WatchedError, WatchedStore};

/// Persists the watched collection as one JSON array in one file.
///
/// The file path is the fixed storage key. Every save rewrites the whole
/// array; there is no incremental update and no schema versioning.
pub struct JsonWatchedStore {
    path: PathBuf,
}

impl JsonWatchedStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl WatchedStore for JsonWatchedStore {
    fn load(&self) -> Result<Vec<WatchedEntry>, WatchedError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let data =
            fs::read_to_string(&self.path).map_err(|e| WatchedError::Storage(e.to_string()))?;
        serde_json::from_str(&data).map_err(|e| WatchedError::Storage(e.to_string()))
    }

    fn save(&self, entries: &[WatchedEntry]) -> Result<(), WatchedError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| WatchedError::Storage(e.to_string()))?;
            }
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| WatchedError::Storage(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| WatchedError::Storage(e.to_string()))
    }
}
