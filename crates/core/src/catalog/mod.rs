//! Catalog of supported conversions and read-only resolution queries.
//!
//! The catalog is a static table of `(source format, target format)`
//! pairs, each bound to a backend tool and the MIME types accepted for
//! the source. It is loaded once at process start and never mutated.
//! The [`Resolver`] layers tool availability on top, exposing only the
//! conversions this process can actually perform.

mod resolver;
mod rules;
mod types;

pub use resolver::{ConversionPair, Resolver};
pub use rules::Catalog;
pub use types::{Category, ConversionRule, Tool};
