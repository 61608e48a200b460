//! The conversion endpoint.

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncWriteExt;

use convertiverse_core::{
    dispatch::validate_upload, Category, ConversionRequest, ConvertError, UploadedFile,
};

use crate::metrics;
use crate::state::AppState;

use super::error::ApiError;

/// Successful conversion response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub success: bool,
    pub message: &'static str,
    pub download_url: String,
    pub view_url: String,
    pub original_name: String,
    pub source_format: String,
    pub target_format: String,
    pub category: Category,
    pub file_size: u64,
}

/// Fields accepted by the multipart form.
#[derive(Debug, Default)]
struct ParsedRequest {
    from: Option<String>,
    to: Option<String>,
    upload: Option<UploadedFile>,
}

/// `POST /convert`: accepts a multipart form with `file`, `from` and
/// `to`, runs the conversion pipeline and reports the artifact location.
pub async fn convert(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ConvertResponse>, ApiError> {
    let parsed = match parse_request(&state, multipart).await {
        Ok(parsed) => parsed,
        Err(e) => return Err(reject(e)),
    };

    let Some(upload) = parsed.upload else {
        return Err(reject(ConvertError::missing_parameters(
            "No file uploaded or file type not supported",
        )));
    };

    let (from, to) = match (parsed.from, parsed.to) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            state.store().release_upload(&upload.path).await;
            return Err(reject(ConvertError::missing_parameters(
                "Both \"from\" and \"to\" parameters are required",
            )));
        }
    };

    // Deferred validation for uploads whose file field arrived before
    // the format fields.
    if let Err(e) = validate_upload(
        state.resolver(),
        &upload.declared_mime,
        Some(&from),
        Some(&to),
    ) {
        state.store().release_upload(&upload.path).await;
        return Err(reject(e));
    }

    let started = Instant::now();
    let conversion = state
        .dispatcher()
        .dispatch(ConversionRequest {
            from: from.clone(),
            to: to.clone(),
            upload,
        })
        .await
        .map_err(reject)?;

    metrics::CONVERSIONS_TOTAL
        .with_label_values(&["success"])
        .inc();
    metrics::CONVERSION_DURATION
        .with_label_values(&[conversion.category.as_str()])
        .observe(started.elapsed().as_secs_f64());

    Ok(Json(ConvertResponse {
        success: true,
        message: "Conversion successful",
        download_url: format!(
            "/download/{}?originalName={}",
            conversion.artifact_id,
            urlencoding::encode(&conversion.produced_name)
        ),
        view_url: format!("/static/{}", conversion.artifact_id),
        original_name: conversion.produced_name,
        source_format: from,
        target_format: to,
        category: conversion.category,
        file_size: conversion.size_bytes,
    }))
}

/// Records the terminal outcome and converts the error for the wire.
fn reject(err: ConvertError) -> ApiError {
    metrics::CONVERSIONS_TOTAL
        .with_label_values(&[err.kind()])
        .inc();
    ApiError(err)
}

/// Reads the multipart stream, persisting the file field into an upload
/// slot. On any error the slot is released before returning, so no
/// rejection path leaves a file in the holding area.
async fn parse_request(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<ParsedRequest, ConvertError> {
    let limit = state.config().storage.max_upload_bytes;
    let mut parsed = ParsedRequest::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                if let Some(upload) = &parsed.upload {
                    state.store().release_upload(&upload.path).await;
                }
                return Err(map_multipart_error(e, limit));
            }
        };

        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "from" => {
                parsed.from = Some(read_text_field(state, &parsed, field, limit).await?);
            }
            "to" => {
                parsed.to = Some(read_text_field(state, &parsed, field, limit).await?);
            }
            "file" => {
                // Only the first file field counts.
                if parsed.upload.is_some() {
                    continue;
                }
                let original_name = field
                    .file_name()
                    .unwrap_or("upload")
                    .to_string();
                let declared_mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                // Early validation: when the format fields precede the
                // file, a bad upload is rejected before any byte is
                // persisted.
                validate_upload(
                    state.resolver(),
                    &declared_mime,
                    parsed.from.as_deref(),
                    parsed.to.as_deref(),
                )?;

                let path = state.store().allocate_upload_slot(&original_name);
                match write_upload(field, &path, limit).await {
                    Ok(size_bytes) => {
                        parsed.upload = Some(UploadedFile {
                            path,
                            declared_mime,
                            original_name,
                            size_bytes,
                        });
                    }
                    Err(e) => {
                        state.store().release_upload(&path).await;
                        return Err(e);
                    }
                }
            }
            _ => {
                // Unknown fields are drained and ignored.
            }
        }
    }

    Ok(parsed)
}

async fn read_text_field(
    state: &AppState,
    parsed: &ParsedRequest,
    field: Field<'_>,
    limit: u64,
) -> Result<String, ConvertError> {
    match field.text().await {
        Ok(text) => Ok(text),
        Err(e) => {
            if let Some(upload) = &parsed.upload {
                state.store().release_upload(&upload.path).await;
            }
            Err(map_multipart_error(e, limit))
        }
    }
}

/// Streams a file field to disk, enforcing the byte ceiling.
async fn write_upload(mut field: Field<'_>, path: &Path, limit: u64) -> Result<u64, ConvertError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| ConvertError::internal(format!("failed to create upload slot: {e}")))?;

    let mut size_bytes = 0u64;
    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => return Err(map_multipart_error(e, limit)),
        };
        size_bytes += chunk.len() as u64;
        if size_bytes > limit {
            return Err(ConvertError::PayloadTooLarge { limit_bytes: limit });
        }
        file.write_all(&chunk)
            .await
            .map_err(|e| ConvertError::internal(format!("failed to persist upload: {e}")))?;
    }

    file.flush()
        .await
        .map_err(|e| ConvertError::internal(format!("failed to persist upload: {e}")))?;

    Ok(size_bytes)
}

fn map_multipart_error(e: MultipartError, limit: u64) -> ConvertError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ConvertError::PayloadTooLarge { limit_bytes: limit }
    } else {
        ConvertError::internal(format!("failed to read multipart request: {e}"))
    }
}
