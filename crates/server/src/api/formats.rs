//! Read-only catalog endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use convertiverse_core::{Category, ConversionPair};

use crate::state::AppState;

/// All currently available conversions, grouped by category.
pub async fn list_converters(
    State(state): State<Arc<AppState>>,
) -> Json<BTreeMap<Category, Vec<ConversionPair>>> {
    Json(state.resolver().available_conversions())
}

/// Distinct source formats the service can currently accept.
pub async fn input_formats(State(state): State<Arc<AppState>>) -> Json<Vec<&'static str>> {
    Json(state.resolver().supported_input_formats())
}

/// Target formats reachable from the given input format.
pub async fn output_formats(
    State(state): State<Arc<AppState>>,
    Path(input_format): Path<String>,
) -> Json<Vec<&'static str>> {
    Json(state.resolver().possible_output_formats(&input_format))
}
