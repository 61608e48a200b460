//! Validation and dispatch of conversion requests.
//!
//! A request moves through `Received -> Validated -> Dispatching ->
//! {Succeeded | Failed}`. Validation rejects unsupported pairs and MIME
//! mismatches before any conversion resource is consumed; the
//! dispatcher re-resolves the rule, invokes the matching backend and
//! guarantees the uploaded file is removed on every terminal path.

mod dispatcher;
mod error;
mod types;
mod validator;

pub use dispatcher::Dispatcher;
pub use error::ConvertError;
pub use types::{produced_name, Conversion, ConversionRequest, UploadedFile};
pub use validator::validate_upload;
