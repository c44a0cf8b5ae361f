//! Serializable index snapshots.
//!
//! The host process persists the index between runs. The engine defines only
//! the shape of that snapshot; the storage medium is the host's concern.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::element::ElementRecord;
use super::file::FileRecord;

/// One `selector → record` pair in a serialized index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorEntry {
    /// The normalized selector variant this record was inserted under.
    pub selector: String,

    /// The record stored at that selector's terminal node.
    pub record: ElementRecord,
}

/// A serializable snapshot of one indexer's file cache and selector index.
///
/// Produced after a full index sweep and consumed at host startup to avoid a
/// cold rebuild. The selector list is flat: each `(selector, record)` pair is
/// one entry, so a record with four variants appears four times.
///
/// # Examples
///
/// ```
/// use ngsi_core::IndexSnapshot;
///
/// let snapshot = IndexSnapshot::default();
/// assert!(snapshot.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    /// Every cached file record, keyed by path in the map the indexer owns.
    pub files: Vec<FileRecord>,

    /// Every `(selector, record)` pair in the trie.
    pub selectors: Vec<SelectorEntry>,
}

impl IndexSnapshot {
    /// Returns `true` if the snapshot carries no files and no selectors.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.selectors.is_empty()
    }

    /// Returns the paths of every file in the snapshot.
    pub fn file_paths(&self) -> impl Iterator<Item = &Utf8PathBuf> {
        self.files.iter().map(|f| &f.path)
    }
}
