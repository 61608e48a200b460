//! Error types for artifact storage.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while managing artifact files.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Artifact reported as produced but missing on disk.
    #[error("Artifact missing: {path}")]
    MissingArtifact { path: PathBuf },

    /// Artifact identifier is not a plain file name.
    #[error("Invalid artifact id: {id}")]
    InvalidArtifactId { id: String },

    /// I/O error while touching storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
