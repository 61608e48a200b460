//! Service-level endpoints: health and metrics.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use convertiverse_core::Tool;

use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub directories: DirectoryStatus,
    pub tools: Vec<ToolStatus>,
    pub input_formats: Vec<&'static str>,
    pub available_conversions: usize,
}

/// Whether each storage area exists on disk.
#[derive(Debug, Serialize)]
pub struct DirectoryStatus {
    pub uploads: bool,
    pub output: bool,
}

#[derive(Debug, Serialize)]
pub struct ToolStatus {
    pub tool: Tool,
    pub available: bool,
}

/// `GET /health`: liveness plus a summary of what the service can do
/// right now.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let tools = state
        .resolver()
        .availability()
        .entries()
        .map(|(tool, available)| ToolStatus { tool, available })
        .collect();

    let available_conversions = state
        .resolver()
        .available_conversions()
        .values()
        .map(Vec::len)
        .sum();

    Json(HealthResponse {
        status: "ok",
        directories: DirectoryStatus {
            uploads: state.store().uploads_dir().is_dir(),
            output: state.store().output_dir().is_dir(),
        },
        tools,
        input_formats: state.resolver().supported_input_formats(),
        available_conversions,
    })
}

/// `GET /metrics`: Prometheus text exposition.
pub async fn metrics_handler() -> String {
    metrics::render()
}
