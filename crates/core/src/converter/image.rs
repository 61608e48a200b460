//! In-process image backend built on the `image` crate.

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use std::path::Path;
use tracing::debug;

use crate::catalog::{ConversionRule, Tool};

use super::error::BackendError;
use super::traits::ConversionBackend;

/// Backend that decodes and re-encodes images with the `image` crate.
///
/// Pixel work is synchronous, so conversions run on the blocking thread
/// pool to keep request handlers responsive.
#[derive(Debug, Default)]
pub struct ImageBackend;

impl ImageBackend {
    pub fn new() -> Self {
        Self
    }

    fn target_format(rule: &ConversionRule) -> Result<ImageFormat, BackendError> {
        // Matches the catalog's image format names.
        match rule.to.to_ascii_uppercase().as_str() {
            "PNG" => Ok(ImageFormat::Png),
            "JPEG" => Ok(ImageFormat::Jpeg),
            "WEBP" => Ok(ImageFormat::WebP),
            "BMP" => Ok(ImageFormat::Bmp),
            "TIFF" => Ok(ImageFormat::Tiff),
            "GIF" => Ok(ImageFormat::Gif),
            other => Err(BackendError::UnsupportedTarget {
                format: other.to_string(),
            }),
        }
    }
}

#[async_trait]
impl ConversionBackend for ImageBackend {
    fn name(&self) -> &'static str {
        "image"
    }

    fn tool(&self) -> Tool {
        Tool::Image
    }

    async fn probe(&self) -> Result<(), BackendError> {
        // The codec library is compiled in; there is nothing external to
        // check.
        Ok(())
    }

    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        rule: &ConversionRule,
    ) -> Result<(), BackendError> {
        let format = Self::target_format(rule)?;
        debug!(
            from = rule.from,
            to = rule.to,
            input = %input.display(),
            "starting image transform"
        );

        let input = input.to_path_buf();
        let output = output.to_path_buf();
        let result = tokio::task::spawn_blocking(move || -> Result<(), BackendError> {
            let img = image::open(&input)
                .map_err(|e| BackendError::failed(format!("failed to decode input: {e}"), None))?;

            // JPEG has no alpha channel; flatten before encoding.
            let img = if format == ImageFormat::Jpeg && img.color().has_alpha() {
                DynamicImage::ImageRgb8(img.to_rgb8())
            } else {
                img
            };

            img.save_with_format(&output, format)
                .map_err(|e| BackendError::failed(format!("failed to encode output: {e}"), None))
        })
        .await;

        match result {
            Ok(inner) => inner,
            Err(join_err) => Err(BackendError::failed(
                format!("image conversion task aborted: {join_err}"),
                None,
            )),
        }
    }
}
