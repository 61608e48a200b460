//! Startup capability probe and the resulting availability snapshot.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::Tool;

use super::traits::ConversionBackend;

/// Write-once map of tool availability.
///
/// Populated by [`probe_backends`] before the server starts accepting
/// conversion traffic and only read afterwards. A tool with no entry is
/// treated as unavailable (fail closed), so a lookup can never race the
/// probe into a wrong "available" answer.
#[derive(Debug, Clone, Default)]
pub struct ToolAvailability {
    tools: HashMap<Tool, bool>,
}

impl ToolAvailability {
    /// Empty snapshot: every tool reads as unavailable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records availability for a tool. Intended for construction at
    /// startup and for tests; the snapshot is not mutated afterwards.
    pub fn with_tool(mut self, tool: Tool, available: bool) -> Self {
        self.tools.insert(tool, available);
        self
    }

    /// Whether the tool is usable in this process.
    pub fn is_available(&self, tool: Tool) -> bool {
        self.tools.get(&tool).copied().unwrap_or(false)
    }

    /// Tools recorded in this snapshot with their availability.
    pub fn entries(&self) -> impl Iterator<Item = (Tool, bool)> + '_ {
        self.tools.iter().map(|(tool, available)| (*tool, *available))
    }
}

/// Probes every backend once and builds the availability snapshot.
///
/// A failed probe marks the tool unavailable and logs a warning; it
/// never aborts startup. Image conversion keeps working when ffmpeg is
/// missing, which is the common degraded deployment.
pub async fn probe_backends(backends: &[Arc<dyn ConversionBackend>]) -> ToolAvailability {
    let mut availability = ToolAvailability::new();
    for backend in backends {
        match backend.probe().await {
            Ok(()) => {
                info!(backend = backend.name(), tool = %backend.tool(), "backend available");
                availability = availability.with_tool(backend.tool(), true);
            }
            Err(e) => {
                warn!(
                    backend = backend.name(),
                    tool = %backend.tool(),
                    error = %e,
                    "backend unavailable, its conversions will be hidden"
                );
                availability = availability.with_tool(backend.tool(), false);
            }
        }
    }
    availability
}
