//! Trait definitions for conversion backends.

use async_trait::async_trait;
use std::path::Path;

use crate::catalog::{ConversionRule, Tool};

use super::error::BackendError;

/// A backend capable of transforming a file from one format to another.
///
/// Backends are black boxes to the dispatch pipeline: given bytes in the
/// rule's source format they either produce the output file at the given
/// path or fail. Partial output left behind on failure is removed by the
/// dispatcher.
#[async_trait]
pub trait ConversionBackend: Send + Sync {
    /// Human-readable backend name, used in logs.
    fn name(&self) -> &'static str;

    /// The catalog tool identifier this backend implements.
    fn tool(&self) -> Tool;

    /// Non-destructive availability check, run once at startup.
    async fn probe(&self) -> Result<(), BackendError>;

    /// Converts `input` into `output` according to `rule`.
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        rule: &ConversionRule,
    ) -> Result<(), BackendError>;
}
