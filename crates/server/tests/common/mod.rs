//! Common test utilities for in-process API testing.
//!
//! The fixture wires the real pipeline (catalog, resolver, dispatcher,
//! storage) against temporary directories, with tool availability set
//! explicitly so tests never depend on what is installed on the host.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use convertiverse_core::{
    ArtifactStore, Catalog, Config, Dispatcher, FfmpegBackend, ImageBackend, Resolver, Tool,
    ToolAvailability,
};
use convertiverse_server::api::create_router;
use convertiverse_server::state::AppState;

const BOUNDARY: &str = "X-FIXTURE-BOUNDARY";

/// Knobs for fixture construction.
pub struct TestConfig {
    /// Whether the ffmpeg tool should be reported as available. The
    /// image backend is always available in tests.
    pub ffmpeg_available: bool,
    pub max_upload_bytes: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            ffmpeg_available: false,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

pub struct TestFixture {
    pub router: Router,
    pub temp_dir: TempDir,
    pub uploads_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// A single part of a multipart request.
pub enum Part {
    Text(&'static str, String),
    File {
        name: &'static str,
        filename: &'static str,
        content_type: &'static str,
        bytes: Vec<u8>,
    },
}

impl TestFixture {
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let uploads_dir = temp_dir.path().join("uploads");
        let output_dir = temp_dir.path().join("public");

        let mut config = Config::default();
        config.storage.uploads_dir = uploads_dir.clone();
        config.storage.output_dir = output_dir.clone();
        config.storage.max_upload_bytes = test_config.max_upload_bytes;

        let store = Arc::new(ArtifactStore::new(&uploads_dir, &output_dir));
        store.init().await.expect("Failed to init storage");

        let availability = Arc::new(
            ToolAvailability::new()
                .with_tool(Tool::Image, true)
                .with_tool(Tool::Ffmpeg, test_config.ffmpeg_available),
        );
        let resolver = Arc::new(Resolver::new(Arc::new(Catalog::builtin()), availability));

        let dispatcher = Arc::new(
            Dispatcher::new(Arc::clone(&resolver), Arc::clone(&store))
                .with_backend(Arc::new(ImageBackend::new()))
                .with_backend(Arc::new(FfmpegBackend::new(&config.tools))),
        );

        let state = Arc::new(AppState::new(config, resolver, dispatcher, store));
        let router = create_router(state);

        Self {
            router,
            temp_dir,
            uploads_dir,
            output_dir,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let (status, _, bytes) = self.get_raw(path).await;
        TestResponse {
            status,
            body: parse_body(&bytes),
        }
    }

    /// GET returning headers and raw bytes, for download assertions.
    pub async fn get_raw(&self, path: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();
        (status, headers, bytes)
    }

    /// POST a multipart form, fields in the given order.
    pub async fn post_multipart(&self, path: &str, parts: Vec<Part>) -> TestResponse {
        let body = encode_multipart(&parts);
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        TestResponse {
            status,
            body: parse_body(&bytes),
        }
    }

    /// Number of files currently sitting in the upload holding area.
    pub fn upload_count(&self) -> usize {
        std::fs::read_dir(&self.uploads_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(bytes).unwrap_or(Value::Null)
    }
}

fn encode_multipart(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// A tiny valid PNG produced in memory.
pub fn sample_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 40, 40, 255]));
    let mut bytes = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("Failed to encode sample PNG");
    bytes.into_inner()
}
