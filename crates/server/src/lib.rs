//! HTTP surface for the Convertiverse conversion service.

pub mod api;
pub mod metrics;
pub mod state;
