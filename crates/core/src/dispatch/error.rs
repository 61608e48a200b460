//! User-facing error taxonomy for the conversion pipeline.

use thiserror::Error;

use crate::catalog::Tool;

/// Terminal failure of a conversion request.
///
/// Every variant carries a stable machine-readable kind (see
/// [`ConvertError::kind`]) plus a human-readable message via `Display`.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// No catalog rule matches, or the rule's tool is unavailable at
    /// resolve time (deliberately indistinguishable).
    #[error("Conversion from {from} to {to} is not supported")]
    UnsupportedConversion { from: String, to: String },

    /// Declared MIME type is not accepted for the requested pair.
    #[error("File type {mime} is not valid for {from} to {to} conversion")]
    MimeMismatch {
        mime: String,
        from: String,
        to: String,
    },

    /// Request omits the file or the format fields.
    #[error("{message}")]
    MissingParameters { message: String },

    /// Tool known-unavailable, recognized before invocation.
    #[error("The {tool} tool is not available on this server")]
    ServiceUnavailable { tool: Tool },

    /// Backend invoked but reported an error (timeouts included).
    #[error("Conversion failed: {message}")]
    ConversionFailed { message: String },

    /// Upload exceeds the configured byte ceiling.
    #[error("The uploaded file exceeds the {limit_bytes} byte size limit")]
    PayloadTooLarge { limit_bytes: u64 },

    /// Contract violation: catalog/tool mismatch, or success reported
    /// but the artifact is missing.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ConvertError {
    /// Stable machine-readable error kind for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedConversion { .. } => "unsupported_conversion",
            Self::MimeMismatch { .. } => "mime_mismatch",
            Self::MissingParameters { .. } => "missing_parameters",
            Self::ServiceUnavailable { .. } => "service_unavailable",
            Self::ConversionFailed { .. } => "conversion_failed",
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn unsupported(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::UnsupportedConversion {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn missing_parameters(message: impl Into<String>) -> Self {
        Self::MissingParameters {
            message: message.into(),
        }
    }

    pub fn conversion_failed(message: impl Into<String>) -> Self {
        Self::ConversionFailed {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
