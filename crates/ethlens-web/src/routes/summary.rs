//! Dataset summary handler.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use ethlens_core::transaction::model::TimeWindow;
use ethlens_core::transaction::time_bounds;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Summary {
    pub transactions: usize,
    pub nodes: usize,
    pub phishing: usize,
    pub paired: usize,
    pub edges: usize,
    pub window: TimeWindow,
    pub first_transaction: Option<DateTime<Utc>>,
    pub last_transaction: Option<DateTime<Utc>>,
    pub neighbors_available: bool,
}

/// GET /api/summary
pub async fn get_summary(State(state): State<AppState>) -> Json<Summary> {
    let data = &state.dataset;
    let bounds = time_bounds(&data.transactions);

    Json(Summary {
        transactions: data.transactions.len(),
        nodes: data.nodes.len(),
        phishing: data.nodes.iter().filter(|r| r.phish_flag).count(),
        paired: data.nodes.iter().filter(|r| r.is_paired()).count(),
        edges: data.edges.len(),
        window: *data.edges.window(),
        first_transaction: bounds.map(|(first, _)| first),
        last_transaction: bounds.map(|(_, last)| last),
        neighbors_available: data.neighbors.is_some(),
    })
}
