//! Error types for the ngsi-indexer crate.
//!
//! This module provides the [`IndexError`] type for errors that can occur
//! during candidate discovery, file indexing, and library indexing.

use camino::Utf8PathBuf;

/// Errors that can occur during indexing operations.
///
/// # Error Recovery Strategy
///
/// - **Walker errors** ([`IndexError::Walk`]): Fatal - propagate immediately
/// - **File read errors** ([`IndexError::Read`]): Log warning, skip file, continue
/// - **Parse errors** ([`IndexError::Parse`]): Log warning, skip file, continue
///
/// A recoverable failure means the affected file or entry point is absent
/// from the index; it never aborts a multi-file sweep.
///
/// # Examples
///
/// ```
/// use ngsi_indexer::IndexError;
///
/// let err = IndexError::config("invalid root path");
/// assert!(err.is_fatal());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Failed to walk a directory.
    ///
    /// This is typically a fatal error that prevents indexing from continuing.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Failed to read a file.
    ///
    /// Contains the path that failed and the underlying I/O error.
    /// Indexing can continue by skipping this file.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The path of the file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a TypeScript file.
    ///
    /// Contains the path that failed and the underlying parse error.
    /// Indexing can continue by skipping this file.
    #[error("failed to parse file {path}: {source}")]
    Parse {
        /// The path of the file that couldn't be parsed.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: ngsi_ts_parser::ParseError,
    },

    /// Invalid indexer configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A path is not valid UTF-8.
    ///
    /// This crate uses UTF-8 paths throughout. If a non-UTF-8 path is
    /// encountered, it cannot be processed.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl IndexError {
    /// Creates a new [`IndexError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`IndexError::Parse`] error.
    #[inline]
    pub fn parse(path: impl Into<Utf8PathBuf>, source: ngsi_ts_parser::ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`IndexError::Config`] error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` if this error is recoverable (indexing can continue).
    ///
    /// Recoverable errors are file-specific issues that don't prevent
    /// indexing other files.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Parse { .. })
    }

    /// Returns `true` if this error is fatal (indexing should stop).
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => Some(path),
            Self::Walk(_) | Self::Config(_) | Self::NonUtf8Path(_) => None,
        }
    }
}
