//! Loading every graph table for one configuration.

use tracing::info;

use ethlens_core::dataset::{load_metadata, load_transactions};
use ethlens_core::transaction::model::Transaction;
use ethlens_core::{Config, EthlensResult};

use crate::edges::{load_or_build_edges, EdgeTable};
use crate::nodes::{load_or_build_nodes, NodeTable};

/// Transactions plus the node and edge tables derived from them.
#[derive(Debug)]
pub struct GraphTables {
    pub transactions: Vec<Transaction>,
    pub nodes: NodeTable,
    /// Edges of the configured window.
    pub edges: EdgeTable,
    pub nodes_built: bool,
    pub edges_built: bool,
}

impl GraphTables {
    /// Load the transaction table and load or build the node and edge tables.
    ///
    /// With `force`, existing node and edge files are rebuilt.
    pub fn load(config: &Config, force: bool) -> EthlensResult<Self> {
        let transactions = load_transactions(&config.data.transactions)?;

        let nodes_built = force || !config.data.nodes.exists();
        let nodes = load_or_build_nodes(
            &config.data.nodes,
            &transactions,
            || load_metadata(config),
            config.graph.pair_conflict,
            force,
        )?;

        let window = config.window.to_window()?;
        let (edges, edges_built) = load_or_build_edges(
            &config.data.edges_path(&window),
            &nodes,
            &transactions,
            &window,
            force,
        )?;

        info!(
            transactions = transactions.len(),
            nodes = nodes.len(),
            edges = edges.len(),
            nodes_built,
            edges_built,
            "Graph tables ready"
        );
        Ok(Self {
            transactions,
            nodes,
            edges,
            nodes_built,
            edges_built,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::tx;
    use ethlens_core::dataset::write_transactions;

    fn config_in(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.data.dir = dir.join("data");
        config.data.transactions = dir.join("data/eth_data.csv");
        config.data.nodes = dir.join("data/address_data.csv");
        config.data.phishing = dir.join("phishing.txt");
        config.data.pairs = dir.join("pairs.txt");
        config.data.node_types = None;
        config.window.start = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        config.window.end = chrono::NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        config
    }

    #[test]
    fn test_builds_then_reuses_tables() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        write_transactions(&config.data.transactions, &[tx("A", "B", 1), tx("B", "C", 2)]).unwrap();
        std::fs::write(&config.data.phishing, "C\n").unwrap();
        std::fs::write(&config.data.pairs, "A,B\n\n").unwrap();

        let first = GraphTables::load(&config, false).unwrap();
        assert!(first.nodes_built && first.edges_built);
        assert_eq!(first.nodes.len(), 3);
        assert_eq!(first.edges.len(), 2);
        assert!(first.nodes.lookup("C").unwrap().phish_flag);
        assert_eq!(first.nodes.lookup("B").unwrap().pair_idx, 0);

        let window = config.window.to_window().unwrap();
        assert!(config.data.edges_path(&window).exists());

        let second = GraphTables::load(&config, false).unwrap();
        assert!(!second.nodes_built && !second.edges_built);
        assert_eq!(second.edges.edges(), first.edges.edges());

        let forced = GraphTables::load(&config, true).unwrap();
        assert!(forced.nodes_built && forced.edges_built);
    }
}
