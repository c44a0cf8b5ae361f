//! Configuration structures for the selector indexer.
//!
//! This module provides [`IndexConfig`], the settings consumed by the
//! file-level indexer: which filename tokens mark candidate files, which
//! directories are skipped during walks, and how work is batched.
//!
//! All configuration types implement [`Default`] with values matching the
//! conventional Angular-style project layout.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the file-level indexer.
///
/// Controls candidate discovery and batching for full index sweeps.
///
/// # Examples
///
/// ```
/// use ngsi_core::IndexConfig;
///
/// let config = IndexConfig::default();
/// assert_eq!(config.batch_size, 20);
/// assert!(config.kind_tokens.iter().any(|t| t == "component"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Absolute path to the project root being indexed.
    pub project_root: Utf8PathBuf,

    /// Filename tokens that mark a file as a candidate for indexing.
    ///
    /// Matching is case-insensitive and substring-based: a file is a
    /// candidate if its name contains any token (`widget.component.ts`,
    /// `HighlightDirective.ts`, `currency.pipe.spec.ts` all match).
    pub kind_tokens: Vec<String>,

    /// File extensions eligible for indexing.
    pub file_extensions: Vec<String>,

    /// Directory names skipped entirely during walks.
    pub skip_dirs: Vec<String>,

    /// Number of files processed per batch during a full index sweep.
    ///
    /// Batches bound peak parse load and give the host a checkpoint
    /// boundary between them for cancellation.
    pub batch_size: usize,

    /// Maximum number of parallel parse jobs within a batch.
    /// `None` means use all available CPU cores.
    pub max_parallel_jobs: Option<usize>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            project_root: Utf8PathBuf::new(),
            kind_tokens: vec![
                "component".to_owned(),
                "directive".to_owned(),
                "pipe".to_owned(),
            ],
            file_extensions: vec![".ts".to_owned()],
            skip_dirs: vec![
                "node_modules".to_owned(),
                ".git".to_owned(),
                "dist".to_owned(),
                ".angular".to_owned(),
            ],
            batch_size: 20,
            max_parallel_jobs: None,
        }
    }
}

impl IndexConfig {
    /// Creates a configuration rooted at `project_root` with default
    /// discovery settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngsi_core::IndexConfig;
    /// use camino::Utf8PathBuf;
    ///
    /// let config = IndexConfig::for_root(Utf8PathBuf::from("/projects/shop"));
    /// assert_eq!(config.project_root.as_str(), "/projects/shop");
    /// ```
    #[must_use]
    pub fn for_root(project_root: Utf8PathBuf) -> Self {
        Self {
            project_root,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingProjectRoot`] if the project root is
    /// empty or does not exist on disk, and [`ConfigError::InvalidOption`]
    /// if `batch_size` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_root.as_str().is_empty() || !self.project_root.is_dir() {
            return Err(ConfigError::MissingProjectRoot(self.project_root.clone()));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidOption {
                option: "batch_size".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    /// Returns `true` if `file_name` matches a kind token and extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngsi_core::IndexConfig;
    ///
    /// let config = IndexConfig::default();
    /// assert!(config.is_candidate_file("widget.component.ts"));
    /// assert!(config.is_candidate_file("MyDirective.ts"));
    /// assert!(!config.is_candidate_file("widget.service.ts"));
    /// assert!(!config.is_candidate_file("widget.component.html"));
    /// ```
    #[must_use]
    pub fn is_candidate_file(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.file_extensions.iter().any(|ext| lower.ends_with(ext))
            && self.kind_tokens.iter().any(|token| lower.contains(token))
    }
}
