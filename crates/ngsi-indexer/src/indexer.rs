//! The incremental file-level indexer.
//!
//! [`Indexer`] owns one project root's selector trie and file cache and
//! keeps them consistent across full sweeps and per-file updates. Within
//! one file's update, stale selector variants are removed before the new
//! set is inserted, so no reader observes both generations at once beyond
//! what the trie's multi-record buckets already tolerate.
//!
//! Full sweeps process candidate files in batches: each batch parses in
//! parallel with per-thread parsers, then applies its results to the trie
//! and cache serially. Batch boundaries double as checkpoints a host can
//! use to inject cancellation between them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::UNIX_EPOCH;

use camino::{Utf8Path, Utf8PathBuf};
use ngsi_core::{
    ElementRecord, FileRecord, IndexConfig, IndexSnapshot, SelectorEntry, SelectorTrie,
    hash_content, selector_variants,
};
use ngsi_ts_parser::{AnnotatedClass, TsParser, extract_annotated_classes, extract_with_fallback};
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::cache::FileCache;
use crate::error::IndexError;
use crate::stats::{IndexStats, StatsSnapshot};
use crate::walker::CandidateWalker;

/// Result of reading and extracting one candidate file.
struct ParsedFile {
    path: Utf8PathBuf,
    last_modified_at: u64,
    content_hash: u64,
    classes: Vec<AnnotatedClass>,
}

/// Incremental selector indexer for one project root.
///
/// The trie and file cache are owned exclusively by this instance; a
/// project-root change means discarding the indexer and creating a new one
/// (see [`IndexerRegistry`](crate::IndexerRegistry)).
///
/// # Concurrency
///
/// `Indexer` is `Send + Sync`. Full sweeps guard against concurrent
/// re-entry with a single in-flight flag: a second concurrent call returns
/// the current snapshot instead of racing. Per-file updates serialize on
/// the internal parser lock and the trie's write lock.
///
/// # Examples
///
/// ```ignore
/// use ngsi_indexer::Indexer;
/// use ngsi_core::IndexConfig;
/// use camino::Utf8PathBuf;
///
/// let config = IndexConfig::for_root(Utf8PathBuf::from("/projects/shop"));
/// let indexer = Indexer::new(config)?;
/// let snapshot = indexer.full_index()?;
///
/// if let Some(record) = indexer.get_element("app-widget") {
///     println!("{} from {}", record.display_name, record.import_source);
/// }
/// ```
pub struct Indexer {
    config: IndexConfig,
    trie: RwLock<SelectorTrie>,
    cache: FileCache,
    stats: IndexStats,
    /// Shared parser for incremental updates; full sweeps use per-thread
    /// parsers instead. `None` when language initialization failed, in
    /// which case extraction falls through to the regex fallback.
    parser: Mutex<Option<TsParser>>,
    full_index_in_flight: AtomicBool,
}

impl Indexer {
    /// Creates an indexer for the configuration's project root.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Config`] if the configuration is invalid
    /// (missing project root, zero batch size).
    pub fn new(config: IndexConfig) -> Result<Self, IndexError> {
        config
            .validate()
            .map_err(|e| IndexError::config(e.to_string()))?;

        Ok(Self {
            config,
            trie: RwLock::new(SelectorTrie::new()),
            cache: FileCache::new(),
            stats: IndexStats::new(),
            parser: Mutex::new(None),
            full_index_in_flight: AtomicBool::new(false),
        })
    }

    /// Returns the project root this indexer serves.
    #[inline]
    #[must_use]
    pub fn project_root(&self) -> &Utf8Path {
        &self.config.project_root
    }

    /// Returns the indexer's configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &IndexConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Incremental updates
    // ------------------------------------------------------------------

    /// Re-indexes one file after a create or change notification.
    ///
    /// A missing file is a no-op, not an error. Read failures are logged
    /// and treated as "no elements found": any prior state for the file is
    /// dropped and indexing of other files is unaffected. When the content
    /// hash is unchanged only the stored modification time is refreshed.
    ///
    /// # Errors
    ///
    /// Currently infallible at the signature level for symmetry with the
    /// batch driver; per-file failures are absorbed as described above.
    pub fn update_file(&self, path: &Utf8Path) -> Result<(), IndexError> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                warn!(%path, error = %e, "failed to stat file; dropping from index");
                self.drop_file_state(path);
                self.stats.increment_errors();
                return Ok(());
            }
        };
        let last_modified_at = unix_mtime(&metadata);

        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                warn!(%path, error = %e, "failed to read file; dropping from index");
                self.drop_file_state(path);
                self.stats.increment_errors();
                return Ok(());
            }
        };
        let content_hash = hash_content(&source);

        if let Some(existing) = self.cache.get(path) {
            if existing.is_unchanged(content_hash) {
                if existing.last_modified_at != last_modified_at {
                    self.cache.touch(path, last_modified_at);
                }
                self.stats.increment_unchanged();
                return Ok(());
            }
            // Stale variants must leave the trie before the new set enters
            self.remove_elements(&existing);
            self.cache.remove(path);
        }

        let classes = {
            let mut parser = self.parser.lock();
            extract_entities(&mut parser, path, &source)
        };

        if classes.is_empty() {
            debug!(%path, "no indexable entities; file not cached");
            return Ok(());
        }

        self.apply_parsed_file(ParsedFile {
            path: path.to_owned(),
            last_modified_at,
            content_hash,
            classes,
        });
        Ok(())
    }

    /// Removes one file's contribution after a delete notification.
    pub fn remove_file(&self, path: &Utf8Path) {
        self.drop_file_state(path);
    }

    // ------------------------------------------------------------------
    // Full sweep
    // ------------------------------------------------------------------

    /// Rebuilds the trie and cache from every candidate file under the
    /// project root.
    ///
    /// Guarded by a single in-flight flag: a concurrent second call does
    /// not race the sweep, it returns the current (possibly stale)
    /// snapshot immediately.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Walk`] if candidate discovery fails.
    /// Per-file read and parse failures are logged and skipped.
    pub fn full_index(&self) -> Result<IndexSnapshot, IndexError> {
        if self
            .full_index_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("full index already in flight; returning current snapshot");
            return Ok(self.snapshot());
        }

        let result = self.run_full_index();
        self.full_index_in_flight.store(false, Ordering::Release);
        result
    }

    fn run_full_index(&self) -> Result<IndexSnapshot, IndexError> {
        self.stats.reset();
        self.trie.write().clear();
        self.cache.clear();

        let walker = CandidateWalker::new(&self.config)?;
        let paths = walker.collect_paths()?;
        info!(root = %self.config.project_root, files = paths.len(), "starting full index");

        let batch_size = self.config.batch_size.max(1);
        for batch in paths.chunks(batch_size) {
            let parsed: Vec<Option<ParsedFile>> = batch
                .par_iter()
                .map_init(
                    || TsParser::new().ok(),
                    |parser, path| self.read_and_extract(parser, path),
                )
                .collect();

            // Trie and cache mutation stays serial per batch
            for file in parsed.into_iter().flatten() {
                if !file.classes.is_empty() {
                    self.apply_parsed_file(file);
                }
            }
        }

        let snapshot = self.snapshot();
        info!(
            files = snapshot.files.len(),
            selectors = snapshot.selectors.len(),
            "full index complete"
        );
        Ok(snapshot)
    }

    fn read_and_extract(&self, parser: &mut Option<TsParser>, path: &Utf8Path) -> Option<ParsedFile> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| {
                warn!(%path, error = %e, "failed to stat file; skipping");
                self.stats.increment_errors();
            })
            .ok()?;
        let source = std::fs::read_to_string(path)
            .map_err(|e| {
                warn!(%path, error = %e, "failed to read file; skipping");
                self.stats.increment_errors();
            })
            .ok()?;

        Some(ParsedFile {
            path: path.to_owned(),
            last_modified_at: unix_mtime(&metadata),
            content_hash: hash_content(&source),
            classes: extract_entities(parser, path, &source),
        })
    }

    // ------------------------------------------------------------------
    // Queries and snapshots
    // ------------------------------------------------------------------

    /// Exact selector lookup with collision disambiguation.
    #[must_use]
    pub fn get_element(&self, selector: &str) -> Option<ElementRecord> {
        self.trie.read().find(selector)
    }

    /// Returns every colliding candidate for `selector`, unfiltered.
    #[must_use]
    pub fn get_elements(&self, selector: &str) -> Vec<ElementRecord> {
        self.trie.read().find_all(selector)
    }

    /// Prefix search over the selector trie.
    #[must_use]
    pub fn search_with_selectors(&self, prefix: &str) -> Vec<SelectorEntry> {
        self.trie.read().search_with_selectors(prefix)
    }

    /// Returns every indexed selector.
    #[must_use]
    pub fn all_selectors(&self) -> Vec<String> {
        self.trie.read().all_selectors()
    }

    /// Returns every distinct indexed record.
    #[must_use]
    pub fn all_elements(&self) -> Vec<ElementRecord> {
        self.trie.read().all_elements()
    }

    /// Serializes the current file cache and selector index.
    #[must_use]
    pub fn snapshot(&self) -> IndexSnapshot {
        IndexSnapshot {
            files: self.cache.all_records(),
            selectors: self.trie.read().search_with_selectors(""),
        }
    }

    /// Replaces the current state with a previously serialized snapshot.
    ///
    /// Used at host startup to avoid a cold rebuild; a subsequent
    /// [`full_index`](Self::full_index) discards restored state again.
    pub fn restore(&self, snapshot: IndexSnapshot) {
        let mut trie = self.trie.write();
        trie.clear();
        self.cache.clear();

        for entry in snapshot.selectors {
            trie.insert(&entry.selector, entry.record);
        }
        for record in snapshot.files {
            self.cache.insert(record);
        }
    }

    /// Returns a point-in-time view of the indexing counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Inserts a library-provided record's variants into the trie.
    pub(crate) fn insert_element(&self, record: &ElementRecord) {
        let mut trie = self.trie.write();
        for selector in &record.selectors {
            trie.insert(selector, record.clone());
        }
        self.stats.add_entities(1);
    }

    fn apply_parsed_file(&self, file: ParsedFile) {
        let elements = self.build_elements(&file.path, file.classes);

        {
            let mut trie = self.trie.write();
            for element in &elements {
                for selector in &element.selectors {
                    trie.insert(selector, element.clone());
                }
            }
        }

        self.stats.increment_files();
        self.stats.add_entities(elements.len() as u64);

        let mut record = FileRecord::new(file.path, file.last_modified_at, file.content_hash);
        record.elements = elements;
        self.cache.insert(record);
    }

    fn build_elements(&self, path: &Utf8Path, classes: Vec<AnnotatedClass>) -> Vec<ElementRecord> {
        let import_source = self.import_source_for(path);
        classes
            .into_iter()
            .map(|class| {
                let mut record = ElementRecord::new(
                    class.kind,
                    class.class_name,
                    import_source.clone(),
                    class.selector,
                    path,
                );
                record.is_standalone = class.standalone;
                record.selectors = selector_variants(&record.original_selector);
                record
            })
            .collect()
    }

    /// Derives the import path for a project-local file: relative to the
    /// project root, forward slashes, extension stripped.
    fn import_source_for(&self, path: &Utf8Path) -> String {
        let relative = path
            .strip_prefix(&self.config.project_root)
            .unwrap_or(path);
        relative.with_extension("").as_str().replace('\\', "/")
    }

    fn drop_file_state(&self, path: &Utf8Path) {
        if let Some(record) = self.cache.remove(path) {
            self.remove_elements(&record);
        }
    }

    fn remove_elements(&self, record: &FileRecord) {
        let mut trie = self.trie.write();
        for element in &record.elements {
            for selector in &element.selectors {
                trie.remove(selector, element.source_file.as_str());
            }
        }
    }
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("project_root", &self.config.project_root)
            .field("cached_files", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Extracts entities from one source, falling back to the regex extractor
/// when structural parsing is unavailable, fails, or yields nothing.
fn extract_entities(
    parser: &mut Option<TsParser>,
    path: &Utf8Path,
    source: &str,
) -> Vec<AnnotatedClass> {
    if parser.is_none() {
        *parser = TsParser::new().ok();
    }

    let structural = parser
        .as_mut()
        .and_then(|p| p.parse(source).ok())
        .and_then(|tree| extract_annotated_classes(&tree, source).ok());

    match structural {
        Some(classes) if !classes.is_empty() => classes,
        _ => path
            .file_name()
            .and_then(|name| extract_with_fallback(name, source))
            .into_iter()
            .collect(),
    }
}

fn unix_mtime(metadata: &std::fs::Metadata) -> u64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_secs())
}
