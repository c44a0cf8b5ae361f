//! Concurrent file record cache.
//!
//! This module provides [`FileCache`], the per-indexer store of
//! [`FileRecord`]s keyed by path. Reads clone the record out of the lock so
//! callers never hold the lock across parsing or trie mutation.

use camino::{Utf8Path, Utf8PathBuf};
use ngsi_core::{FileRecord, FxHashMap};
use parking_lot::RwLock;

/// Thread-safe cache of per-file index state.
///
/// # Examples
///
/// ```
/// use ngsi_indexer::FileCache;
/// use ngsi_core::FileRecord;
/// use camino::{Utf8Path, Utf8PathBuf};
///
/// let cache = FileCache::new();
/// let record = FileRecord::new(Utf8PathBuf::from("src/a.component.ts"), 1, 2);
/// cache.insert(record);
///
/// assert!(cache.get(Utf8Path::new("src/a.component.ts")).is_some());
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct FileCache {
    records: RwLock<FxHashMap<Utf8PathBuf, FileRecord>>,
}

impl FileCache {
    /// Creates an empty cache.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the record for its path.
    pub fn insert(&self, record: FileRecord) {
        self.records.write().insert(record.path.clone(), record);
    }

    /// Returns a clone of the record for `path`, if cached.
    #[must_use]
    pub fn get(&self, path: &Utf8Path) -> Option<FileRecord> {
        self.records.read().get(path).cloned()
    }

    /// Removes and returns the record for `path`.
    pub fn remove(&self, path: &Utf8Path) -> Option<FileRecord> {
        self.records.write().remove(path)
    }

    /// Updates the stored modification time for `path`, if cached.
    ///
    /// Used when a file's content hash is unchanged but its timestamp moved.
    pub fn touch(&self, path: &Utf8Path, last_modified_at: u64) {
        if let Some(record) = self.records.write().get_mut(path) {
            record.last_modified_at = last_modified_at;
        }
    }

    /// Removes every record.
    pub fn clear(&self) {
        self.records.write().clear();
    }

    /// Returns the number of cached files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` if no file is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Returns a clone of every cached record.
    ///
    /// Used when serializing a snapshot.
    #[must_use]
    pub fn all_records(&self) -> Vec<FileRecord> {
        self.records.read().values().cloned().collect()
    }
}
