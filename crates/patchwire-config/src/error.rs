//! Error types for patch persistence.

use std::path::PathBuf;
use thiserror::Error;

use patchwire_core::GraphError;

/// Errors that abort a persistence operation as a whole.
///
/// Problems with individual records while loading are not errors: they are
/// reported as [`LoadWarning`](crate::LoadWarning)s.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Text is not JSON, or could not be serialized
    #[error("invalid patch JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON that is not shaped like a patch document at all
    #[error("malformed patch document: {0}")]
    PersistenceFormat(String),

    /// Patch not found by name
    #[error("patch not found: {0}")]
    PatchNotFound(String),

    /// Graph operation failed
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
