//! Error types for conversion backends.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by a backend while probing or converting.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend binary not found.
    #[error("Tool not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// Conversion did not finish within the deadline.
    #[error("Conversion timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The backend ran but reported an error.
    #[error("Conversion failed: {reason}")]
    Failed {
        reason: String,
        stderr: Option<String>,
    },

    /// The rule names a target format this backend cannot produce.
    /// Indicates a catalog/tool mismatch.
    #[error("Unsupported target format: {format}")]
    UnsupportedTarget { format: String },

    /// I/O error while running the backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    /// Creates a new failure with optional stderr output.
    pub fn failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Whether this error means the tool itself is unusable, as opposed
    /// to this particular input being rejected.
    pub fn is_tool_unusable(&self) -> bool {
        matches!(self, Self::ToolNotFound { .. })
    }
}
