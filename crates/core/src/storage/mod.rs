//! Artifact lifecycle management.
//!
//! Uploaded files live in a request-scoped holding area and are removed
//! unconditionally once their conversion reaches a terminal state.
//! Converted artifacts live in the output area under opaque random
//! names until an external retention policy removes them.

mod error;
mod store;

pub use error::StorageError;
pub use store::ArtifactStore;
