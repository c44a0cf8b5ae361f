//! Per-project-root resolver cache.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use ngsi_core::FxHashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::alias::{AliasResolver, PathMappings};

/// Caches one [`AliasResolver`] per project root.
///
/// The alias trie is derived from a project's path-mapping configuration,
/// so a configuration reload must [`invalidate`](Self::invalidate) the
/// root rather than overwrite it in place; a stale trie must not outlive
/// its source data.
#[derive(Debug, Default)]
pub struct AliasResolverCache {
    resolvers: RwLock<FxHashMap<Utf8PathBuf, Arc<AliasResolver>>>,
}

impl AliasResolverCache {
    /// Creates an empty cache.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the resolver for `root`, building one from `mappings` on
    /// first use.
    pub fn get_or_build(&self, root: &Utf8Path, mappings: &PathMappings) -> Arc<AliasResolver> {
        if let Some(resolver) = self.get(root) {
            return resolver;
        }

        let mut resolvers = self.resolvers.write();
        if let Some(resolver) = resolvers.get(root) {
            return Arc::clone(resolver);
        }

        debug!(%root, "building alias resolver");
        let resolver = Arc::new(AliasResolver::new(mappings));
        resolvers.insert(root.to_owned(), Arc::clone(&resolver));
        resolver
    }

    /// Returns the cached resolver for `root`, if any.
    #[must_use]
    pub fn get(&self, root: &Utf8Path) -> Option<Arc<AliasResolver>> {
        self.resolvers.read().get(root).map(Arc::clone)
    }

    /// Drops the cached resolver for `root`.
    ///
    /// Called when the root's path-mapping configuration changes; the
    /// next [`get_or_build`](Self::get_or_build) sees fresh mappings.
    pub fn invalidate(&self, root: &Utf8Path) {
        if self.resolvers.write().remove(root).is_some() {
            debug!(%root, "alias resolver invalidated");
        }
    }

    /// Drops every cached resolver.
    pub fn clear(&self) {
        self.resolvers.write().clear();
    }

    /// Returns the number of cached roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolvers.read().len()
    }

    /// Returns `true` if no resolver is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.read().is_empty()
    }
}
