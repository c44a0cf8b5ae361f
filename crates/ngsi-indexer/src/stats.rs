//! Index statistics with atomic counters.
//!
//! This module provides [`IndexStats`] for tracking sweep progress and
//! [`StatsSnapshot`] for point-in-time views. Counters use relaxed atomic
//! ordering; statistics are informational and need no strict ordering.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic counters for indexing statistics.
///
/// # Examples
///
/// ```
/// use ngsi_indexer::IndexStats;
///
/// let stats = IndexStats::new();
/// stats.increment_files();
/// stats.add_entities(2);
///
/// let snap = stats.snapshot();
/// assert_eq!(snap.files_indexed, 1);
/// assert_eq!(snap.entities_indexed, 2);
/// ```
#[derive(Debug, Default)]
pub struct IndexStats {
    /// Number of files indexed (parsed and stored).
    files_indexed: AtomicU64,
    /// Number of entities inserted into the trie.
    entities_indexed: AtomicU64,
    /// Number of files skipped because their content hash was unchanged.
    files_unchanged: AtomicU64,
    /// Number of files that failed to read or parse.
    errors: AtomicU64,
}

impl IndexStats {
    /// Creates a new [`IndexStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the indexed-files counter.
    #[inline]
    pub fn increment_files(&self) {
        self.files_indexed.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds to the indexed-entities counter.
    #[inline]
    pub fn add_entities(&self, count: u64) {
        self.entities_indexed.fetch_add(count, Ordering::Relaxed);
    }

    /// Increments the unchanged-files counter.
    #[inline]
    pub fn increment_unchanged(&self) {
        self.files_unchanged.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the error counter.
    #[inline]
    pub fn increment_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Resets every counter to zero; called at the start of a full sweep.
    pub fn reset(&self) {
        self.files_indexed.store(0, Ordering::Relaxed);
        self.entities_indexed.store(0, Ordering::Relaxed);
        self.files_unchanged.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
    }

    /// Takes a point-in-time snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            files_indexed: self.files_indexed.load(Ordering::Relaxed),
            entities_indexed: self.entities_indexed.load(Ordering::Relaxed),
            files_unchanged: self.files_unchanged.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time view of [`IndexStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Number of files indexed.
    pub files_indexed: u64,
    /// Number of entities inserted into the trie.
    pub entities_indexed: u64,
    /// Number of files skipped as unchanged.
    pub files_unchanged: u64,
    /// Number of files that failed to read or parse.
    pub errors: u64,
}
