//! Conversion backends and the startup capability probe.
//!
//! Two backends implement [`ConversionBackend`]:
//!
//! - [`ImageBackend`] transforms images in-process with the `image`
//!   crate and is always available.
//! - [`FfmpegBackend`] shells out to an external ffmpeg binary for
//!   audio/video transcodes and may be unavailable in a given
//!   deployment.
//!
//! [`probe_backends`] runs each backend's non-destructive probe once at
//! startup; the resulting [`ToolAvailability`] snapshot gates which
//! catalog rules the resolver exposes for the lifetime of the process.

mod availability;
mod error;
mod ffmpeg;
mod image;
mod traits;

pub use availability::{probe_backends, ToolAvailability};
pub use error::BackendError;
pub use ffmpeg::FfmpegBackend;
// self:: disambiguates the module from the `image` crate
pub use self::image::ImageBackend;
pub use traits::ConversionBackend;

#[cfg(test)]
pub(crate) use traits::testing;
