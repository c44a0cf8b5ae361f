//! Candidate file discovery.
//!
//! This module provides [`CandidateWalker`], which uses the `ignore` crate
//! to walk a project tree while respecting `.gitignore` patterns, keeping
//! only files whose names carry one of the entity kind tokens
//! (`*component*`, `*directive*`, `*pipe*`, case-insensitive).

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use ngsi_core::IndexConfig;

use crate::error::IndexError;

/// A file walker that discovers candidate entity files in a project tree.
///
/// Uses the `ignore` crate for efficient traversal with gitignore support.
/// The walker collects all paths first; parallel parsing happens afterwards
/// in batches, which keeps memory bounded and lets the indexer checkpoint
/// between batches.
///
/// # Examples
///
/// ```ignore
/// use ngsi_indexer::CandidateWalker;
/// use ngsi_core::IndexConfig;
///
/// let walker = CandidateWalker::new(&config)?;
/// let paths = walker.collect_paths()?;
/// println!("Found {} candidate files", paths.len());
/// ```
#[derive(Debug)]
pub struct CandidateWalker {
    /// The root directory to walk.
    root: Utf8PathBuf,
    /// Directory names to skip.
    skip_dirs: Vec<String>,
    /// Discovery settings (kind tokens, extensions).
    config: IndexConfig,
}

impl CandidateWalker {
    /// Creates a new walker for the configuration's project root.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Config`] if the project root doesn't exist or
    /// isn't a directory.
    pub fn new(config: &IndexConfig) -> Result<Self, IndexError> {
        let root = &config.project_root;
        if !root.exists() {
            return Err(IndexError::config(format!(
                "project root does not exist: {root}"
            )));
        }
        if !root.is_dir() {
            return Err(IndexError::config(format!(
                "project root is not a directory: {root}"
            )));
        }

        Ok(Self {
            root: root.clone(),
            skip_dirs: config.skip_dirs.clone(),
            config: config.clone(),
        })
    }

    /// Collects every candidate file path under the project root.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Walk`] if directory traversal fails and
    /// [`IndexError::NonUtf8Path`] if a non-UTF-8 path is encountered.
    pub fn collect_paths(&self) -> Result<Vec<Utf8PathBuf>, IndexError> {
        let mut paths = Vec::new();

        for result in self.build_walker() {
            let entry = result?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let utf8_path = Utf8Path::from_path(path)
                .ok_or_else(|| IndexError::NonUtf8Path(path.to_owned()))?;

            if !self.is_candidate(utf8_path) {
                continue;
            }
            if self.should_skip_path(utf8_path) {
                continue;
            }

            paths.push(utf8_path.to_owned());
        }

        Ok(paths)
    }

    /// Builds the ignore walker with configured settings.
    fn build_walker(&self) -> ignore::Walk {
        WalkBuilder::new(&self.root)
            // Enable standard filters (.gitignore, .ignore, hidden files)
            .standard_filters(true)
            .follow_links(false)
            // Use a single thread for walking (parsing parallelizes later)
            .threads(1)
            .require_git(false)
            .build()
    }

    /// Checks if a path's filename matches a kind token and extension.
    fn is_candidate(&self, path: &Utf8Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.config.is_candidate_file(name))
    }

    /// Checks if a path should be skipped based on directory name.
    fn should_skip_path(&self, path: &Utf8Path) -> bool {
        path.components()
            .any(|component| self.skip_dirs.iter().any(|d| d == component.as_str()))
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}
