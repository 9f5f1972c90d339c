//! Content-keyed dataset memoization.
//!
//! Each lookup re-reads the file bytes and hashes them. When the hash matches
//! the cached entry for that path, the cached [`Dataset`] is returned and its
//! listings are shared, not re-parsed. A changed file is parsed again and
//! replaces the old entry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::loader::{parse_listings, Dataset, LoadError};
use crate::domain::DatasetHash;

/// Explicitly constructed cache of loaded datasets, keyed by path and content hash.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<PathBuf, Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the dataset for `path`, parsing only if the content changed.
    pub fn get_or_load(&self, path: &Path) -> Result<Dataset, LoadError> {
        let key = cache_key(path);
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let hash = DatasetHash::of_bytes(&bytes);

        if let Some(hit) = self.lookup(&key, &hash) {
            tracing::debug!(path = %path.display(), hash = hash.short(), "dataset cache hit");
            return Ok(hit);
        }

        let dataset = parse_listings(&bytes)?;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.insert(key, dataset.clone()).is_some() {
            tracing::warn!(
                path = %path.display(),
                hash = hash.short(),
                "dataset changed on disk, reloaded"
            );
        } else {
            tracing::info!(
                path = %path.display(),
                listings = dataset.len(),
                hash = hash.short(),
                "loaded listings"
            );
        }
        Ok(dataset)
    }

    /// Drop the cached entry for `path`, if any.
    pub fn invalidate(&self, path: &Path) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(&cache_key(path)).is_some()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &Path, hash: &DatasetHash) -> Option<Dataset> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|ds| ds.hash() == hash)
            .cloned()
    }
}

fn cache_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
