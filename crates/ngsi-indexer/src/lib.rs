//! Incremental selector indexing for Angular-style projects.
//!
//! This crate drives the end-to-end indexing pipeline: candidate file
//! discovery, structural extraction via `ngsi-ts-parser`, and the
//! per-root selector trie and file cache from `ngsi-core`.
//!
//! # Architecture
//!
//! - [`CandidateWalker`] discovers entity files under a project root,
//!   honoring ignore rules and configured skip directories.
//! - [`Indexer`] owns one root's trie and cache, supports full parallel
//!   sweeps, per-file incremental updates, and snapshot save/restore.
//! - [`LibraryIndexer`] feeds compiled-dependency declaration files into
//!   an indexer's trie, resolving module-exported entities to their
//!   public import path.
//! - [`IndexerRegistry`] holds one indexer per project root for hosts
//!   that serve several roots at once.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod cache;
mod error;
mod indexer;
mod library;
mod registry;
mod stats;
mod walker;

pub use cache::FileCache;
pub use error::IndexError;
pub use indexer::Indexer;
pub use library::{LibraryEntryPoint, LibraryIndexer};
pub use registry::IndexerRegistry;
pub use stats::{IndexStats, StatsSnapshot};
pub use walker::CandidateWalker;
