//! Mapping of pipeline errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use convertiverse_core::ConvertError;

/// Error body shared by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    /// Stable machine-readable error kind.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Wrapper turning a [`ConvertError`] into the API's error contract.
#[derive(Debug)]
pub struct ApiError(pub ConvertError);

impl From<ConvertError> for ApiError {
    fn from(err: ConvertError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            ConvertError::UnsupportedConversion { .. }
            | ConvertError::MimeMismatch { .. }
            | ConvertError::MissingParameters { .. } => StatusCode::BAD_REQUEST,
            ConvertError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ConvertError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ConvertError::ConversionFailed { .. } | ConvertError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
