//! Types for the dispatch pipeline.

use std::path::PathBuf;

use crate::catalog::Category;

/// An uploaded file awaiting conversion. Owned exclusively by the
/// current request; deleted once dispatch reaches a terminal state.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Location in the upload holding area.
    pub path: PathBuf,
    /// MIME type declared by the client.
    pub declared_mime: String,
    /// Client-side filename, used only to derive the produced name.
    pub original_name: String,
    /// Size as received.
    pub size_bytes: u64,
}

/// A validated conversion request, consumed by a single dispatch.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub from: String,
    pub to: String,
    pub upload: UploadedFile,
}

/// Successful conversion outcome.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Opaque name of the artifact in the output area.
    pub artifact_id: String,
    /// Full path of the produced artifact.
    pub output_path: PathBuf,
    /// Logical filename for the client: the original name with its
    /// extension swapped to the target format.
    pub produced_name: String,
    /// MIME type of the produced artifact.
    pub output_mime: &'static str,
    /// Category of the rule that executed, derived from the catalog.
    pub category: Category,
    /// Size of the produced artifact in bytes.
    pub size_bytes: u64,
}

/// Derives the client-facing output name: the original name with its
/// last extension stripped and the lowercased target format appended.
pub fn produced_name(original_name: &str, target_format: &str) -> String {
    let stem = original_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(original_name);
    format!("{}.{}", stem, target_format.to_ascii_lowercase())
}
