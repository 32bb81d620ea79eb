//! Ethlens Web Server
//!
//! Axum-based web server for the dashboard and JSON API.

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use state::{AppState, Dataset};

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/summary", get(routes::summary::get_summary))
        .route("/timeline", get(routes::timeline::get_timeline))
        // Accounts
        .route("/accounts/{address}", get(routes::accounts::get_account))
        .route("/accounts/{address}/activity", get(routes::accounts::get_activity))
        .route("/accounts/{address}/profile", get(routes::accounts::get_profile))
        // Graph
        .route("/graph/ego/{address}", get(routes::graph::get_ego))
        .route("/graph/group", get(routes::graph::get_group))
        // Embeddings
        .route("/neighbors/{address}", get(routes::neighbors::get_neighbors))
        .with_state(state.clone());

    Router::new()
        .route("/", get(routes::dashboard::index))
        .route("/graph/{address}", get(routes::graph::get_graph_page))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use ethlens_core::address::model::{AddressMetadata, PairConflictPolicy};
    use ethlens_core::transaction::model::Transaction;
    use ethlens_core::Config;
    use ethlens_embedding::{EmbeddingMatrix, NearestNeighborIndex};
    use ethlens_graph::{build_edges, build_nodes};
    use serde_json::Value;
    use tower::ServiceExt;

    fn tx(from: &str, to: &str, day: u32, hour: u32) -> Transaction {
        Transaction {
            hash: format!("0x{from}{to}{day}{hour}"),
            from_address: from.to_string(),
            to_address: to.to_string(),
            value: 2.5,
            timestamp: Utc.with_ymd_and_hms(2021, 3, day, hour, 0, 0).unwrap(),
        }
    }

    fn state(with_neighbors: bool) -> AppState {
        let config = Config::default();
        let transactions = vec![
            tx("0xa", "0xb", 1, 9),
            tx("0xb", "0xc", 1, 10),
            tx("0xa", "0xc", 3, 9),
            tx("0xd", "0xa", 4, 23),
        ];
        let metadata = AddressMetadata {
            phishing: ["0xc".to_string()].into_iter().collect(),
            pair_groups: vec![vec!["0xa".to_string(), "0xd".to_string()]],
            node_types: None,
        };
        let nodes = build_nodes(&transactions, &metadata, PairConflictPolicy::FirstMatch).unwrap();
        let window = config.window.to_window().unwrap();
        let edges = build_edges(&nodes, &transactions, &window).unwrap();

        let neighbors = with_neighbors.then(|| {
            let matrix = EmbeddingMatrix::from_rows(vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![3.0, 4.0], vec![0.5, 0.0]])
                .unwrap();
            let addresses = ["0xa", "0xb", "0xc", "0xd"].map(String::from).to_vec();
            NearestNeighborIndex::build(matrix, addresses).unwrap()
        });

        AppState::new(Dataset::from_parts(config, transactions, nodes, edges, neighbors))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> Value {
        let (status, body) = get(app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}: {body}");
        serde_json::from_str(&body).unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_is_served() {
        let (status, body) = get(create_router(state(true)), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<html"));
    }

    #[tokio::test]
    async fn test_dashboard_overlays_pair_activity() {
        let (_, body) = get(create_router(state(true)), "/").await;
        assert!(body.contains("/activity?freq="));
        assert!(body.contains("account.paired_with[0]"));
        assert!(!body.contains("innerHTML"));
    }

    #[tokio::test]
    async fn test_summary() {
        let json = get_json(create_router(state(true)), "/api/summary").await;
        assert_eq!(json["transactions"], 4);
        assert_eq!(json["nodes"], 4);
        assert_eq!(json["edges"], 4);
        assert_eq!(json["phishing"], 1);
        assert_eq!(json["paired"], 2);
        assert_eq!(json["neighbors_available"], true);
    }

    #[tokio::test]
    async fn test_timeline_counts_and_range() {
        let json = get_json(create_router(state(true)), "/api/timeline?freq=D").await;
        let counts: Vec<u64> = json["buckets"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["count"].as_u64().unwrap())
            .collect();
        assert_eq!(counts, vec![2, 0, 1, 1]);

        let json = get_json(
            create_router(state(true)),
            "/api/timeline?freq=D&start=2021-03-01&end=2021-03-04",
        )
        .await;
        assert_eq!(json["buckets"].as_array().unwrap().len(), 2);

        let (status, _) = get(create_router(state(true)), "/api/timeline?freq=W").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_account_endpoints() {
        let json = get_json(create_router(state(true)), "/api/accounts/0xa").await;
        assert_eq!(json["id"], 0);
        assert_eq!(json["pair_idx"], 0);
        assert_eq!(json["paired_with"], serde_json::json!(["0xd"]));
        assert_eq!(json["sent"], 2);
        assert_eq!(json["received"], 1);

        let json = get_json(create_router(state(true)), "/api/accounts/0xa/activity?freq=D").await;
        let total: u64 = json["buckets"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["count"].as_u64().unwrap())
            .sum();
        assert_eq!(total, 2);

        let json = get_json(create_router(state(true)), "/api/accounts/0xa/profile").await;
        assert_eq!(json["hourly"][9], 2);
        // 2021-03-01 and 2021-03-03 are Monday and Wednesday.
        assert_eq!(json["weekly"][0], 1);
        assert_eq!(json["weekly"][2], 1);

        let (status, _) = get(create_router(state(true)), "/api/accounts/0xmissing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ego_graph_json() {
        let json = get_json(create_router(state(true)), "/api/graph/ego/0xa").await;
        assert_eq!(json["focal"], serde_json::json!([0]));
        assert_eq!(json["edges"].as_array().unwrap().len(), 4);
        assert_eq!(json["nodes"].as_array().unwrap().len(), 4);

        let (status, _) = get(create_router(state(true)), "/api/graph/ego/0xA").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get(create_router(state(true)), "/api/graph/ego/0xa?expansion=sideways").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_group_graph_json() {
        let json = get_json(create_router(state(true)), "/api/graph/group?addresses=0xa,0xd").await;
        assert_eq!(json["focal"], serde_json::json!([0, 3]));

        let (status, _) = get(create_router(state(true)), "/api/graph/group?addresses=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_graph_page() {
        let (status, body) = get(create_router(state(true)), "/graph/0xa").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("vis.Network"));
        assert!(body.contains("0xa (2017-06-22_2022-03-01)"));
    }

    #[tokio::test]
    async fn test_neighbors() {
        let json = get_json(create_router(state(true)), "/api/neighbors/0xa?k=2").await;
        let ranked: Vec<&str> = json["neighbors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["address"].as_str().unwrap())
            .collect();
        assert_eq!(ranked, vec!["0xd", "0xb"]);

        let json = get_json(create_router(state(true)), "/api/neighbors/0xa?mask=0xc,0xb").await;
        assert_eq!(json["neighbors"].as_array().unwrap().len(), 2);
        assert_eq!(json["neighbors"][0]["address"], "0xb");

        let (status, _) = get(create_router(state(true)), "/api/neighbors/0xa?metric=manhattan").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(create_router(state(true)), "/api/neighbors/0xa?metric=cosine").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(create_router(state(false)), "/api/neighbors/0xa").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
