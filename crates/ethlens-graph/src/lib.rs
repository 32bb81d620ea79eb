//! # Ethlens Graph
//!
//! Address graph construction for ethlens.
//!
//! Builds the node table (dense ids for every address), per-window edge
//! tables (transfers aggregated per ordered pair), ego-subgraph queries,
//! and the interactive network pages rendered from them.
//! [`GraphTables`] loads or builds all of them for one configuration.

pub mod edges;
pub mod nodes;
pub mod queries;
pub mod render;
pub mod tables;

pub use edges::{build_edges, load_or_build_edges, Edge, EdgeTable};
pub use nodes::{build_nodes, load_or_build_nodes, NodeTable};
pub use queries::{get_ego_subgraph, get_ego_subgraph_for_group, EgoEdge, EgoGraph};
pub use render::{render_graph_page, to_vis_network, write_graph_page, GeneratedGraphPage, PageKind, VisNetwork};
pub use tables::GraphTables;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, TimeZone, Utc};
    use ethlens_core::transaction::model::{TimeWindow, Transaction};

    pub fn tx(from: &str, to: &str, day: u32) -> Transaction {
        tx_valued(from, to, day, 1.0)
    }

    pub fn tx_valued(from: &str, to: &str, day: u32, value: f64) -> Transaction {
        Transaction {
            hash: format!("0x{from}{to}{day}"),
            from_address: from.to_string(),
            to_address: to.to_string(),
            value,
            timestamp: Utc.with_ymd_and_hms(2020, 1, day, 0, 0, 0).unwrap(),
        }
    }

    pub fn all_time() -> TimeWindow {
        TimeWindow::from_dates(
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2100, 1, 1).unwrap(),
        )
        .unwrap()
    }
}
