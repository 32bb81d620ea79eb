//! Account handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use ethlens_core::address::model::AddressRecord;
use ethlens_core::timeline::model::{ActivityProfile, Bucket, Frequency};
use ethlens_core::timeline::{account_activity, activity_profile};

use super::{api_error, parse_or, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    #[serde(flatten)]
    pub record: AddressRecord,
    /// Other members of the address's de-anonymization group.
    pub paired_with: Vec<String>,
    pub sent: usize,
    pub received: usize,
}

/// GET /api/accounts/{address}
pub async fn get_account(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Json<AccountResponse>> {
    let data = &state.dataset;
    let record = data.nodes.lookup(&address).map_err(api_error)?;

    let paired_with = data
        .nodes
        .pair_members(record.id)
        .map_err(api_error)?
        .into_iter()
        .filter(|&id| id != record.id)
        .filter_map(|id| data.nodes.address_of(id).map(str::to_string))
        .collect();

    let sent = data.transactions.iter().filter(|t| t.from_address == address).count();
    let received = data.transactions.iter().filter(|t| t.to_address == address).count();

    Ok(Json(AccountResponse {
        record: record.clone(),
        paired_with,
        sent,
        received,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub freq: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub address: String,
    pub freq: Frequency,
    pub buckets: Vec<Bucket>,
}

/// GET /api/accounts/{address}/activity?freq
pub async fn get_activity(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<ActivityQuery>,
) -> ApiResult<Json<ActivityResponse>> {
    let data = &state.dataset;
    data.nodes.resolve(&address).map_err(api_error)?;
    let freq = parse_or(query.freq.as_deref(), Frequency::Daily)?;

    let buckets = account_activity(&data.transactions, &address, freq);
    Ok(Json(ActivityResponse { address, freq, buckets }))
}

/// GET /api/accounts/{address}/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Json<ActivityProfile>> {
    let data = &state.dataset;
    data.nodes.resolve(&address).map_err(api_error)?;
    Ok(Json(activity_profile(&data.transactions, &address)))
}
