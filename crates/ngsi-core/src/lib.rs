//! Core types, selector grammar, and selector trie for ng-selector-index.
//!
//! This crate provides the foundational pieces shared across the workspace:
//!
//! - Domain types ([`ElementRecord`], [`FileRecord`], [`IndexSnapshot`])
//! - The selector grammar parser ([`selector_variants`])
//! - The selector-keyed prefix index ([`SelectorTrie`])
//! - Configuration structures ([`IndexConfig`])
//! - Error types and `FxHashMap`/`FxHashSet` aliases

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod selector;
pub mod trie;
pub mod types;

pub use config::IndexConfig;
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet, hash_content, hash_path};
pub use selector::selector_variants;
pub use trie::SelectorTrie;
pub use types::{ElementKind, ElementRecord, FileRecord, IndexSnapshot, SelectorEntry};
