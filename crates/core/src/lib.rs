//! Core conversion pipeline for the Convertiverse service.
//!
//! The pipeline is: catalog lookup ([`catalog`]) -> upload validation
//! ([`dispatch::validate_upload`]) -> backend invocation
//! ([`dispatch::Dispatcher`] over [`converter`] backends) -> artifact
//! lifecycle ([`storage`]). The HTTP surface lives in the server crate;
//! nothing in here depends on axum.

pub mod catalog;
pub mod config;
pub mod converter;
pub mod dispatch;
pub mod storage;

pub use catalog::{Catalog, Category, ConversionPair, ConversionRule, Resolver, Tool};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ServerConfig,
    StorageConfig, ToolsConfig,
};
pub use converter::{
    probe_backends, BackendError, ConversionBackend, FfmpegBackend, ImageBackend, ToolAvailability,
};
pub use dispatch::{
    produced_name, Conversion, ConversionRequest, ConvertError, Dispatcher, UploadedFile,
};
pub use storage::{ArtifactStore, StorageError};
