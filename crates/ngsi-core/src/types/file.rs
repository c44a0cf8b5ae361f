//! Per-file index cache entries.
//!
//! This module provides [`FileRecord`], the cache entry the incremental
//! indexer keeps for every scanned source file.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::element::ElementRecord;

/// The cached index state of one scanned source file.
///
/// One `FileRecord` exists per file that has been scanned. An empty
/// `elements` list means the file was scanned and found to contain no
/// indexable entities, which is distinct from "not yet scanned" (no record
/// at all). The indexer drops rather than stores empty records, so an empty
/// list only appears transiently.
///
/// # Examples
///
/// ```
/// use ngsi_core::FileRecord;
/// use camino::Utf8PathBuf;
///
/// let record = FileRecord::new(
///     Utf8PathBuf::from("src/app/widget.component.ts"),
///     1_704_067_200,
///     0xDEAD_BEEF,
/// );
/// assert!(record.elements.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// The file path, absolute or relative to the indexer's project root.
    pub path: Utf8PathBuf,

    /// Unix timestamp of the file's last observed modification time.
    pub last_modified_at: u64,

    /// Hash of the file contents for change detection.
    ///
    /// When the file is re-indexed, an equal hash means the content did not
    /// change and extraction is skipped.
    pub content_hash: u64,

    /// Every indexable entity the file declares.
    pub elements: Vec<ElementRecord>,
}

impl FileRecord {
    /// Creates a record with no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngsi_core::FileRecord;
    /// use camino::Utf8PathBuf;
    ///
    /// let record = FileRecord::new(Utf8PathBuf::from("src/foo.pipe.ts"), 0, 42);
    /// assert_eq!(record.content_hash, 42);
    /// ```
    #[must_use]
    pub const fn new(path: Utf8PathBuf, last_modified_at: u64, content_hash: u64) -> Self {
        Self {
            path,
            last_modified_at,
            content_hash,
            elements: Vec::new(),
        }
    }

    /// Returns `true` if the stored hash matches `content_hash`.
    #[inline]
    #[must_use]
    pub const fn is_unchanged(&self, content_hash: u64) -> bool {
        self.content_hash == content_hash
    }

    /// Returns the number of indexed entities in this file.
    #[inline]
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}
