use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::{Any, CorsLayer}, services::ServeDir, trace::TraceLayer};

use super::{convert, download, formats, handlers};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Converted artifacts are browsable in place under /static
    let static_files = ServeDir::new(state.store().output_dir());

    // Uploads can exceed the configured ceiling by a little multipart
    // framing overhead before the per-file check kicks in.
    let body_limit = state.config().storage.max_upload_bytes as usize + 64 * 1024;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        // Catalog
        .route("/api/converters", get(formats::list_converters))
        .route("/api/formats/input", get(formats::input_formats))
        .route("/api/formats/output/{input_format}", get(formats::output_formats))
        // Conversion pipeline
        .route("/convert", post(convert::convert))
        .route("/download/{artifact_id}", get(download::download))
        // Service
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics_handler))
        .nest_service("/static", static_files)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
