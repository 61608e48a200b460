//! Artifact download endpoint.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadQuery {
    pub original_name: Option<String>,
}

/// `GET /download/{artifact_id}`: streams a converted artifact as an
/// attachment. The optional `originalName` query parameter controls
/// the suggested filename; it falls back to the artifact id itself.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(artifact_id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    let path = match state.store().output_file(&artifact_id) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(artifact_id = %artifact_id, error = %e, "rejected download request");
            return not_found();
        }
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(_) => return not_found(),
    };

    let filename = query
        .original_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| artifact_id.clone());

    let content_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| state.resolver().catalog().mime_for_extension(ext))
        .unwrap_or("application/octet-stream");

    metrics::DOWNLOADS_TOTAL.inc();

    let body = Body::from_stream(ReaderStream::new(file));
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", sanitize_filename(&filename)),
            ),
        ],
        body,
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "File not found" })),
    )
        .into_response()
}

/// Strips characters that would break the quoted header value.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '"' && *c != '\r' && *c != '\n')
        .collect()
}
