//! Import path resolution for indexed entities.
//!
//! Maps an absolute file location to the import path a consumer should
//! write: the deepest configured path alias when one covers the location,
//! otherwise a `./`-prefixed relative path.
//!
//! - [`AliasTrie`] indexes cleaned mapping targets by lower-cased path
//!   segment with a longest-prefix-match lookup.
//! - [`AliasResolver`] wraps the trie with the relative-path fallback.
//! - [`AliasResolverCache`] holds one resolver per project root and is
//!   invalidated when a root's path-mapping configuration reloads.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod alias;
mod cache;
mod paths;

pub use alias::{AliasResolver, AliasTrie, PathMappings};
pub use cache::AliasResolverCache;
pub use paths::{project_anchor, relative_import, strip_source_extension};
