//! Time-series handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use ethlens_core::timeline::model::{Bucket, Frequency};
use ethlens_core::timeline::{count_by_bucket, within};
use ethlens_core::transaction::model::timestamp_format;
use ethlens_core::EthlensError;

use super::{api_error, parse_or, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    pub freq: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub freq: Frequency,
    pub buckets: Vec<Bucket>,
}

/// Accept a bare date (midnight UTC) or a full timestamp.
pub(crate) fn parse_bound(raw: Option<&str>) -> ApiResult<Option<DateTime<Utc>>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date.and_time(chrono::NaiveTime::MIN).and_utc()));
    }
    timestamp_format::parse(raw)
        .map(Some)
        .map_err(|e| api_error(EthlensError::validation(e)))
}

/// GET /api/timeline?freq&start&end
pub async fn get_timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> ApiResult<Json<TimelineResponse>> {
    let freq = parse_or(query.freq.as_deref(), Frequency::Daily)?;
    let start = parse_bound(query.start.as_deref())?;
    let end = parse_bound(query.end.as_deref())?;

    let buckets = within(count_by_bucket(&state.dataset.transactions, freq), start, end);
    Ok(Json(TimelineResponse { freq, buckets }))
}
