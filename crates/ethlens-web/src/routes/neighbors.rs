//! Nearest-neighbor handler.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use ethlens_core::Metric;
use ethlens_embedding::Neighbor;

use super::{api_error, parse_or, split_list, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NeighborsQuery {
    pub k: Option<usize>,
    pub metric: Option<String>,
    /// Comma-separated candidate addresses.
    pub mask: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NeighborsResponse {
    pub address: String,
    pub metric: Metric,
    pub k: usize,
    pub neighbors: Vec<Neighbor>,
}

/// GET /api/neighbors/{address}?k&metric&mask
pub async fn get_neighbors(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<NeighborsQuery>,
) -> ApiResult<Json<NeighborsResponse>> {
    let data = &state.dataset;
    let index = data.neighbors.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "No embedding artifact is loaded".to_string(),
        )
    })?;

    let metric = parse_or(query.metric.as_deref(), data.config.neighbors.metric)?;
    let k = query.k.unwrap_or(data.config.neighbors.top_k);
    let mask = index
        .mask_for_addresses(&split_list(query.mask.as_deref()))
        .map_err(api_error)?;

    let neighbors = index.query(&address, k, metric, &mask).map_err(api_error)?;
    Ok(Json(NeighborsResponse {
        address,
        metric,
        k,
        neighbors,
    }))
}
