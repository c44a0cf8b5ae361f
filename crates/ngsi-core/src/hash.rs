//! Fast hashing utilities and hash map type aliases.
//!
//! This module provides type aliases for [`FxHashMap`] and [`FxHashSet`] from the
//! `rustc-hash` crate, plus the content/path hashing functions used by the
//! incremental indexer for change detection. The Fx hash algorithm is
//! approximately 2x faster than the standard library's default hasher for
//! string keys and does not provide denial-of-service resistance, which is
//! fine for internal-only tables.
//!
//! # Examples
//!
//! ```
//! use ngsi_core::{FxHashMap, hash_content};
//!
//! let mut map: FxHashMap<String, u64> = FxHashMap::default();
//! map.insert("button.component.ts".to_owned(), hash_content("export class Button {}"));
//! assert_eq!(map.len(), 1);
//! ```

use std::hash::{Hash, Hasher};

use camino::Utf8Path;
use rustc_hash::FxHasher;

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
///
/// This is faster than the standard library's `HashMap` for string keys
/// but does not provide denial-of-service resistance.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
///
/// This is faster than the standard library's `HashSet` for string keys
/// but does not provide denial-of-service resistance.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// The hasher used by [`FxHashMap`] and [`FxHashSet`].
pub type FxBuildHasher = rustc_hash::FxBuildHasher;

/// Computes a fast hash of file contents using `FxHash`.
///
/// Used by the indexer to decide whether a file changed since it was last
/// indexed. Identical content always produces the same hash within a single
/// build of the tool.
///
/// # Examples
///
/// ```
/// use ngsi_core::hash_content;
///
/// let a = hash_content("export class Button {}");
/// let b = hash_content("export class Button {}");
/// let c = hash_content("export class Icon {}");
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// ```
#[must_use]
pub fn hash_content(content: &str) -> u64 {
    let mut hasher = FxHasher::default();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Computes a fast hash of a file path using `FxHash`.
#[must_use]
pub fn hash_path(path: &Utf8Path) -> u64 {
    let mut hasher = FxHasher::default();
    path.hash(&mut hasher);
    hasher.finish()
}
