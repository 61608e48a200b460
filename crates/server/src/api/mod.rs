pub mod convert;
pub mod download;
pub mod error;
pub mod formats;
pub mod handlers;
pub mod routes;

pub use routes::create_router;
