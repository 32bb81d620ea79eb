//! Application state.

use std::sync::Arc;
use tracing::{info, warn};

use ethlens_core::transaction::model::Transaction;
use ethlens_core::{Config, EthlensResult};
use ethlens_embedding::NearestNeighborIndex;
use ethlens_graph::{EdgeTable, GraphTables, NodeTable};

/// Every table the queries run against, loaded once and never mutated.
#[derive(Debug)]
pub struct Dataset {
    pub config: Config,
    /// Time-sorted transactions.
    pub transactions: Vec<Transaction>,
    pub nodes: NodeTable,
    /// Edges of the configured window.
    pub edges: EdgeTable,
    /// `None` when no embedding artifact is available.
    pub neighbors: Option<NearestNeighborIndex>,
}

impl Dataset {
    /// Load the graph tables and, when present, the embedding artifact.
    pub fn load(config: Config) -> EthlensResult<Self> {
        let tables = GraphTables::load(&config, false)?;

        let neighbors = if config.data.embeddings.exists() {
            Some(NearestNeighborIndex::load(&config.data.embeddings)?)
        } else {
            warn!(
                path = %config.data.embeddings.display(),
                "Embedding artifact not found, neighbor queries are disabled"
            );
            None
        };

        info!(neighbors = neighbors.as_ref().map_or(0, NearestNeighborIndex::len), "Dataset ready");
        Ok(Self::from_parts(
            config,
            tables.transactions,
            tables.nodes,
            tables.edges,
            neighbors,
        ))
    }

    pub fn from_parts(
        config: Config,
        transactions: Vec<Transaction>,
        nodes: NodeTable,
        edges: EdgeTable,
        neighbors: Option<NearestNeighborIndex>,
    ) -> Self {
        Self {
            config,
            transactions,
            nodes,
            edges,
            neighbors,
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}
