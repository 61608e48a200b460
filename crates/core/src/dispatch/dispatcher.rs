//! Routes validated requests to the correct backend and manages the
//! artifact lifecycle around the invocation.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::{Resolver, Tool};
use crate::converter::{BackendError, ConversionBackend};
use crate::storage::ArtifactStore;

use super::error::ConvertError;
use super::types::{produced_name, Conversion, ConversionRequest};

/// Dispatches conversion requests.
///
/// A dispatch moves through `Received -> Validated -> Dispatching ->
/// {Succeeded | Failed}`; terminal states are final and no retries are
/// attempted. Whatever the outcome, the uploaded input file is released
/// before the result is returned.
pub struct Dispatcher {
    resolver: Arc<Resolver>,
    store: Arc<ArtifactStore>,
    backends: HashMap<Tool, Arc<dyn ConversionBackend>>,
}

impl Dispatcher {
    pub fn new(resolver: Arc<Resolver>, store: Arc<ArtifactStore>) -> Self {
        Self {
            resolver,
            store,
            backends: HashMap::new(),
        }
    }

    /// Registers a backend under its tool identifier.
    pub fn with_backend(mut self, backend: Arc<dyn ConversionBackend>) -> Self {
        self.backends.insert(backend.tool(), backend);
        self
    }

    /// Runs a conversion to a terminal state.
    ///
    /// The upload is released on every exit path, including backend
    /// panics surfaced as errors; callers never need to clean up after a
    /// dispatch.
    pub async fn dispatch(&self, request: ConversionRequest) -> Result<Conversion, ConvertError> {
        let result = self.run(&request).await;
        self.store.release_upload(&request.upload.path).await;

        match &result {
            Ok(conversion) => info!(
                from = %request.from,
                to = %request.to,
                artifact = %conversion.artifact_id,
                input_bytes = request.upload.size_bytes,
                size_bytes = conversion.size_bytes,
                "conversion succeeded"
            ),
            Err(e) => warn!(
                from = %request.from,
                to = %request.to,
                input_bytes = request.upload.size_bytes,
                kind = e.kind(),
                error = %e,
                "conversion failed"
            ),
        }

        result
    }

    async fn run(&self, request: &ConversionRequest) -> Result<Conversion, ConvertError> {
        // Re-resolve rather than trusting the caller's earlier lookup:
        // this also covers clients that bypassed upload validation.
        let rule = self
            .resolver
            .resolve(&request.from, &request.to)
            .ok_or_else(|| ConvertError::unsupported(&request.from, &request.to))?
            .to_owned();

        let backend = self.backends.get(&rule.tool).ok_or_else(|| {
            ConvertError::internal(format!("no backend registered for tool {}", rule.tool))
        })?;

        // The external transcoder gets a pre-flight availability check
        // so a flip between resolution and execution surfaces as 503,
        // not as a confusing backend failure.
        if rule.tool == Tool::Ffmpeg && !self.resolver.availability().is_available(rule.tool) {
            return Err(ConvertError::ServiceUnavailable { tool: rule.tool });
        }

        let (artifact_id, output_path) = self.store.allocate_output_slot(rule.to);

        if let Err(e) = backend.convert(&request.upload.path, &output_path, &rule).await {
            // No partial output is ever surfaced to the client.
            self.store.discard_output(&output_path).await;
            return Err(Self::map_backend_error(rule.tool, e));
        }

        let size_bytes = self
            .store
            .finalize_output(&output_path)
            .await
            .map_err(|e| ConvertError::internal(e.to_string()))?;

        let category = self
            .resolver
            .category_of(&request.from, &request.to)
            .ok_or_else(|| {
                ConvertError::internal(format!(
                    "rule {} -> {} vanished from the catalog",
                    request.from, request.to
                ))
            })?;

        Ok(Conversion {
            artifact_id,
            output_path,
            produced_name: produced_name(&request.upload.original_name, rule.to),
            output_mime: rule.produced_mime,
            category,
            size_bytes,
        })
    }

    fn map_backend_error(tool: Tool, error: BackendError) -> ConvertError {
        if error.is_tool_unusable() {
            return ConvertError::ServiceUnavailable { tool };
        }
        match error {
            BackendError::UnsupportedTarget { format } => ConvertError::internal(format!(
                "catalog names target format {format} that the {tool} backend cannot produce"
            )),
            other => ConvertError::conversion_failed(other.to_string()),
        }
    }
}
