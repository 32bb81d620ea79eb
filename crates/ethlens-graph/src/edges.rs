//! Edge table: transfers aggregated per ordered address pair and time window.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

use ethlens_core::transaction::model::{TimeWindow, Transaction};
use ethlens_core::transaction::in_window;
use ethlens_core::{EthlensError, EthlensResult};

use crate::nodes::NodeTable;

/// Aggregated transfers from one node to another.
///
/// The CSV column names follow the original address-keyed export even
/// though the values are node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "from_address")]
    pub from_id: u32,
    #[serde(rename = "to_address")]
    pub to_id: u32,
    /// Summed value in ether.
    pub value: f64,
    /// Number of transactions.
    pub count: u64,
}

/// All edges of one time window, indexed by endpoint.
#[derive(Debug, Clone)]
pub struct EdgeTable {
    window: TimeWindow,
    node_count: usize,
    edges: Vec<Edge>,
    outgoing: HashMap<u32, Vec<usize>>,
    incoming: HashMap<u32, Vec<usize>>,
}

impl EdgeTable {
    /// Index `edges`, checking ids against `node_count` and rejecting repeated pairs.
    pub fn new(window: TimeWindow, node_count: usize, mut edges: Vec<Edge>) -> EthlensResult<Self> {
        edges.sort_by_key(|e| (e.from_id, e.to_id));

        let mut seen = HashSet::with_capacity(edges.len());
        let mut outgoing: HashMap<u32, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<u32, Vec<usize>> = HashMap::new();

        for (idx, edge) in edges.iter().enumerate() {
            for id in [edge.from_id, edge.to_id] {
                if id as usize >= node_count {
                    return Err(EthlensError::NodeNotFound(id));
                }
            }
            if !seen.insert((edge.from_id, edge.to_id)) {
                return Err(EthlensError::validation(format!(
                    "edge {} -> {} appears more than once in one window",
                    edge.from_id, edge.to_id
                )));
            }
            outgoing.entry(edge.from_id).or_default().push(idx);
            incoming.entry(edge.to_id).or_default().push(idx);
        }

        Ok(Self {
            window,
            node_count,
            edges,
            outgoing,
            incoming,
        })
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    /// Size of the node table the edges refer to.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Edges ordered by `(from_id, to_id)`.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge(&self, idx: usize) -> &Edge {
        &self.edges[idx]
    }

    /// Positions of edges leaving `id`.
    pub fn outgoing(&self, id: u32) -> &[usize] {
        self.outgoing.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Positions of edges entering `id`.
    pub fn incoming(&self, id: u32) -> &[usize] {
        self.incoming.get(&id).map_or(&[], Vec::as_slice)
    }

    pub fn contains_node(&self, id: u32) -> bool {
        (id as usize) < self.node_count
    }

    /// Total number of transactions across all edges.
    pub fn transaction_count(&self) -> u64 {
        self.edges.iter().map(|e| e.count).sum()
    }

    /// Write as CSV with columns `from_address,to_address,value,count`.
    pub fn write_csv(&self, path: &Path) -> EthlensResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        for edge in &self.edges {
            writer.serialize(edge)?;
        }
        writer.flush()?;
        debug!(path = %path.display(), edges = self.len(), "Wrote edge table");
        Ok(())
    }

    /// Load an edge table for `window`, validating every id against `nodes`.
    pub fn load_csv(path: &Path, window: TimeWindow, nodes: &NodeTable) -> EthlensResult<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut edges = Vec::new();
        for row in reader.deserialize() {
            edges.push(row?);
        }
        let table = Self::new(window, nodes.len(), edges)?;
        info!(path = %path.display(), edges = table.len(), window = %window.label(), "Loaded edge table");
        Ok(table)
    }
}

/// Aggregate the transactions inside `window` into one edge per ordered pair.
///
/// Every address in the window must be present in `nodes`; a missing one
/// means the node table was built from different data and is an error.
pub fn build_edges(
    nodes: &NodeTable,
    transactions: &[Transaction],
    window: &TimeWindow,
) -> EthlensResult<EdgeTable> {
    let mut grouped: BTreeMap<(&str, &str), (f64, u64)> = BTreeMap::new();
    let mut in_window_count = 0usize;

    for tx in in_window(transactions, window) {
        let entry = grouped
            .entry((tx.from_address.as_str(), tx.to_address.as_str()))
            .or_insert((0.0, 0));
        entry.0 += tx.value;
        entry.1 += 1;
        in_window_count += 1;
    }

    let mut edges = Vec::with_capacity(grouped.len());
    for ((from, to), (value, count)) in grouped {
        let from_id = nodes.id_of(from).ok_or_else(|| EthlensError::UnknownAddress {
            address: from.to_string(),
        })?;
        let to_id = nodes.id_of(to).ok_or_else(|| EthlensError::UnknownAddress {
            address: to.to_string(),
        })?;
        edges.push(Edge {
            from_id,
            to_id,
            value,
            count,
        });
    }

    let table = EdgeTable::new(*window, nodes.len(), edges)?;
    info!(
        window = %window.label(),
        transactions = in_window_count,
        edges = table.len(),
        "Built edge table"
    );
    Ok(table)
}

/// Load the edge table at `path`, or build and write it if absent (or `force`).
///
/// Returns the table and whether it was freshly built.
pub fn load_or_build_edges(
    path: &Path,
    nodes: &NodeTable,
    transactions: &[Transaction],
    window: &TimeWindow,
    force: bool,
) -> EthlensResult<(EdgeTable, bool)> {
    if path.exists() && !force {
        return Ok((EdgeTable::load_csv(path, *window, nodes)?, false));
    }
    let table = build_edges(nodes, transactions, window)?;
    table.write_csv(path)?;
    Ok((table, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::build_nodes;
    use crate::test_support::{all_time, tx, tx_valued};
    use ethlens_core::address::model::{AddressMetadata, PairConflictPolicy};

    fn nodes_for(txs: &[Transaction]) -> NodeTable {
        build_nodes(txs, &AddressMetadata::default(), PairConflictPolicy::FirstMatch).unwrap()
    }

    #[test]
    fn test_three_node_scenario() {
        let txs = vec![tx_valued("A", "B", 1, 2.0), tx_valued("B", "C", 2, 3.0), tx_valued("A", "C", 3, 4.0)];
        let nodes = nodes_for(&txs);
        let edges = build_edges(&nodes, &txs, &all_time()).unwrap();

        let pairs: Vec<(u32, u32, f64, u64)> = edges
            .edges()
            .iter()
            .map(|e| (e.from_id, e.to_id, e.value, e.count))
            .collect();
        assert_eq!(pairs, vec![(0, 1, 2.0, 1), (0, 2, 4.0, 1), (1, 2, 3.0, 1)]);
    }

    #[test]
    fn test_duplicates_are_summed_and_counted() {
        let txs = vec![
            tx_valued("A", "B", 1, 1.5),
            tx_valued("A", "B", 2, 2.5),
            tx_valued("B", "A", 3, 1.0),
        ];
        let nodes = nodes_for(&txs);
        let edges = build_edges(&nodes, &txs, &all_time()).unwrap();

        assert_eq!(edges.len(), 2);
        assert_eq!(edges.edge(0), &Edge { from_id: 0, to_id: 1, value: 4.0, count: 2 });
        assert_eq!(edges.outgoing(0), &[0]);
        assert_eq!(edges.incoming(0), &[1]);
    }

    #[test]
    fn test_counts_match_transactions_in_window() {
        let txs: Vec<Transaction> = (1..=20)
            .map(|day| tx(["A", "B", "C"][day as usize % 3], ["B", "C", "D", "A"][day as usize % 4], day))
            .collect();
        let nodes = nodes_for(&txs);
        let window = TimeWindow::from_dates(
            chrono::NaiveDate::from_ymd_opt(2020, 1, 5).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
        )
        .unwrap();
        let edges = build_edges(&nodes, &txs, &window).unwrap();

        let expected = txs.iter().filter(|t| window.contains(&t.timestamp)).count() as u64;
        assert_eq!(expected, 10);
        assert_eq!(edges.transaction_count(), expected);
    }

    #[test]
    fn test_unknown_address_is_a_hard_error() {
        let nodes = nodes_for(&[tx("A", "B", 1)]);
        let txs = vec![tx("A", "B", 1), tx("A", "Z", 2)];
        let err = build_edges(&nodes, &txs, &all_time()).unwrap_err();
        match err {
            EthlensError::UnknownAddress { address } => assert_eq!(address, "Z"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_table_rejects_bad_ids_and_repeats() {
        let edge = Edge { from_id: 0, to_id: 5, value: 1.0, count: 1 };
        assert!(matches!(
            EdgeTable::new(all_time(), 2, vec![edge]),
            Err(EthlensError::NodeNotFound(5))
        ));

        let e = Edge { from_id: 0, to_id: 1, value: 1.0, count: 1 };
        assert!(EdgeTable::new(all_time(), 2, vec![e.clone(), e]).is_err());
    }

    #[test]
    fn test_load_or_build_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.csv");
        let txs = vec![tx("A", "B", 1), tx("B", "C", 2)];
        let nodes = nodes_for(&txs);

        let (built, fresh) = load_or_build_edges(&path, &nodes, &txs, &all_time(), false).unwrap();
        assert!(fresh);
        let header = std::fs::read_to_string(&path).unwrap();
        assert!(header.starts_with("from_address,to_address,value,count"));

        let (loaded, fresh) = load_or_build_edges(&path, &nodes, &[], &all_time(), false).unwrap();
        assert!(!fresh);
        assert_eq!(loaded.edges(), built.edges());

        let (rebuilt, fresh) = load_or_build_edges(&path, &nodes, &[], &all_time(), true).unwrap();
        assert!(fresh);
        assert!(rebuilt.is_empty());
    }

    #[test]
    fn test_load_rejects_ids_outside_node_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.csv");
        std::fs::write(&path, "from_address,to_address,value,count\n0,9,1.0,1\n").unwrap();
        let nodes = nodes_for(&[tx("A", "B", 1)]);
        assert!(EdgeTable::load_csv(&path, all_time(), &nodes).is_err());
    }
}
