//! Per-root indexer registry.
//!
//! Hosts that serve several project roots at once hold one [`Indexer`] per
//! root. The registry owns that mapping behind a single lock and hands out
//! `Arc` handles, so switching the active root never mutates an existing
//! indexer's state.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use ngsi_core::{FxHashMap, IndexConfig};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::IndexError;
use crate::indexer::Indexer;

/// Maps project roots to their indexers.
///
/// # Examples
///
/// ```ignore
/// use ngsi_indexer::IndexerRegistry;
/// use camino::Utf8Path;
///
/// let registry = IndexerRegistry::new();
/// let indexer = registry.get_or_create(Utf8Path::new("/projects/shop"))?;
/// indexer.full_index()?;
/// ```
#[derive(Debug, Default)]
pub struct IndexerRegistry {
    indexers: RwLock<FxHashMap<Utf8PathBuf, Arc<Indexer>>>,
}

impl IndexerRegistry {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the indexer for `root`, creating one with default
    /// configuration on first use.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Config`] if `root` fails configuration
    /// validation when a new indexer has to be created.
    pub fn get_or_create(&self, root: &Utf8Path) -> Result<Arc<Indexer>, IndexError> {
        if let Some(indexer) = self.get(root) {
            return Ok(indexer);
        }

        let mut indexers = self.indexers.write();
        // A concurrent caller may have won the race between the read above
        // and taking the write lock.
        if let Some(indexer) = indexers.get(root) {
            return Ok(Arc::clone(indexer));
        }

        debug!(%root, "creating indexer");
        let indexer = Arc::new(Indexer::new(IndexConfig::for_root(root.to_owned()))?);
        indexers.insert(root.to_owned(), Arc::clone(&indexer));
        Ok(indexer)
    }

    /// Returns the indexer for `root`, if one exists.
    #[must_use]
    pub fn get(&self, root: &Utf8Path) -> Option<Arc<Indexer>> {
        self.indexers.read().get(root).map(Arc::clone)
    }

    /// Drops the indexer for `root` and returns it, if one existed.
    ///
    /// Existing `Arc` handles stay valid; the registry just stops handing
    /// the indexer out.
    pub fn remove(&self, root: &Utf8Path) -> Option<Arc<Indexer>> {
        self.indexers.write().remove(root)
    }

    /// Drops every indexer.
    pub fn clear(&self) {
        self.indexers.write().clear();
    }

    /// Returns the number of registered roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indexers.read().len()
    }

    /// Returns `true` if no root is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indexers.read().is_empty()
    }

    /// Returns every registered root.
    #[must_use]
    pub fn roots(&self) -> Vec<Utf8PathBuf> {
        self.indexers.read().keys().cloned().collect()
    }
}
