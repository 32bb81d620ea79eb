//! Ego-graph handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::Deserialize;

use ethlens_core::{EthlensError, Expansion};
use ethlens_graph::queries::{get_ego_subgraph, get_ego_subgraph_for_group};
use ethlens_graph::render::{render_graph_page, to_vis_network, PageKind, VisNetwork};

use super::{api_error, parse_or, split_list, ApiResult};
use crate::state::{AppState, Dataset};

#[derive(Debug, Deserialize)]
pub struct EgoQuery {
    pub expansion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GroupQuery {
    pub addresses: Option<String>,
    pub expansion: Option<String>,
}

fn expansion(data: &Dataset, raw: Option<&str>) -> ApiResult<Expansion> {
    parse_or(raw, data.config.graph.expansion)
}

/// GET /api/graph/ego/{address}
pub async fn get_ego(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<EgoQuery>,
) -> ApiResult<Json<VisNetwork>> {
    let data = &state.dataset;
    let expansion = expansion(data, query.expansion.as_deref())?;
    let focal = data.nodes.resolve(&address).map_err(api_error)?;

    let ego = get_ego_subgraph(&data.edges, focal, data.config.graph.radius, expansion).map_err(api_error)?;
    let network = to_vis_network(&ego, &data.nodes).map_err(api_error)?;
    Ok(Json(network))
}

/// GET /api/graph/group?addresses=a,b
pub async fn get_group(
    State(state): State<AppState>,
    Query(query): Query<GroupQuery>,
) -> ApiResult<Json<VisNetwork>> {
    let data = &state.dataset;
    let expansion = expansion(data, query.expansion.as_deref())?;

    let addresses = split_list(query.addresses.as_deref());
    if addresses.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "addresses must list at least one address".to_string()));
    }
    let ids = addresses
        .iter()
        .map(|a| data.nodes.resolve(a))
        .collect::<Result<Vec<_>, EthlensError>>()
        .map_err(api_error)?;

    let ego = get_ego_subgraph_for_group(&data.edges, &ids, data.config.graph.radius, expansion)
        .map_err(api_error)?;
    let network = to_vis_network(&ego, &data.nodes).map_err(api_error)?;
    Ok(Json(network))
}

/// GET /graph/{address} - Standalone ego-graph page.
pub async fn get_graph_page(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<EgoQuery>,
) -> ApiResult<Html<String>> {
    let data = &state.dataset;
    let expansion = expansion(data, query.expansion.as_deref())?;
    let record = data.nodes.lookup(&address).map_err(api_error)?;

    // The requested address leads; its pair partners join the focal group.
    let mut focal = vec![record.id];
    focal.extend(
        data.nodes
            .pair_members(record.id)
            .map_err(api_error)?
            .into_iter()
            .filter(|&id| id != record.id),
    );
    let ego = get_ego_subgraph_for_group(&data.edges, &focal, data.config.graph.radius, expansion)
        .map_err(api_error)?;
    let network = to_vis_network(&ego, &data.nodes).map_err(api_error)?;

    let title = format!("{} ({})", record.address, data.edges.window().label());
    let page = render_graph_page(&network, &ego, PageKind::for_record(record), &title).map_err(api_error)?;
    Ok(Html(page.html))
}
