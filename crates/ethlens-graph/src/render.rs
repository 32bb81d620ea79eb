//! Conversion of ego-subgraphs into vis-network data and standalone HTML pages.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use tracing::info;

use ethlens_core::address::model::{AddressRecord, NodeType};
use ethlens_core::{EthlensError, EthlensResult};

use crate::nodes::NodeTable;
use crate::queries::EgoGraph;

const GRAPH_PAGE_TEMPLATE: &str = include_str!("../templates/graph_page.html");

/// Display category of a node, in decreasing priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Focal,
    Phishing,
    Paired,
    Other,
}

impl NodeCategory {
    fn of(record: &AddressRecord, is_focal: bool) -> Self {
        if is_focal {
            Self::Focal
        } else if record.phish_flag {
            Self::Phishing
        } else if record.is_paired() {
            Self::Paired
        } else {
            Self::Other
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Focal => "#e4572e",
            Self::Phishing => "#f3a712",
            Self::Paired => "#4c9f70",
            Self::Other => "#5b8def",
        }
    }
}

fn shape(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Eoa => "dot",
        NodeType::Contract => "square",
        NodeType::Unknown => "diamond",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisNode {
    pub id: u32,
    pub label: String,
    /// Hover text; the full address.
    pub title: String,
    pub color: &'static str,
    pub shape: &'static str,
    pub group: NodeCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisEdge {
    pub from: u32,
    pub to: u32,
    pub width: u32,
    pub title: String,
    pub hop: u8,
}

/// Node and edge lists in the shape vis-network's `DataSet` expects.
#[derive(Debug, Clone, Serialize)]
pub struct VisNetwork {
    pub focal: Vec<u32>,
    pub nodes: Vec<VisNode>,
    pub edges: Vec<VisEdge>,
}

/// Label an ego-subgraph with addresses, categories and shapes.
pub fn to_vis_network(graph: &EgoGraph, nodes: &NodeTable) -> EthlensResult<VisNetwork> {
    let mut vis_nodes = Vec::new();
    for id in graph.node_ids() {
        let record = nodes.record(id)?;
        let category = NodeCategory::of(record, graph.focal.contains(&id));
        vis_nodes.push(VisNode {
            id,
            label: id.to_string(),
            title: format!("{} ({})", record.address, record.node_type),
            color: category.color(),
            shape: shape(record.node_type),
            group: category,
        });
    }

    let vis_edges = graph
        .edges
        .iter()
        .map(|e| VisEdge {
            from: e.from_id,
            to: e.to_id,
            width: e.width,
            title: format!("value: {:.4} ETH, count: {}", e.value, e.count),
            hop: e.hop,
        })
        .collect();

    Ok(VisNetwork {
        focal: graph.focal.clone(),
        nodes: vis_nodes,
        edges: vis_edges,
    })
}

/// Which ground-truth view a page belongs to; decides the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Deanon,
    Phish,
}

impl PageKind {
    /// Deanon for paired addresses, phish otherwise.
    pub fn for_record(record: &AddressRecord) -> Self {
        if record.is_paired() {
            Self::Deanon
        } else {
            Self::Phish
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Deanon => "deanon",
            Self::Phish => "phish",
        }
    }

    pub fn file_name(&self, focal_id: u32) -> String {
        format!("{}_label-pred_{}.html", self.prefix(), focal_id)
    }
}

/// A rendered, not yet written, graph page.
#[derive(Debug, Clone)]
pub struct GeneratedGraphPage {
    pub kind: PageKind,
    pub focal_id: u32,
    pub html: String,
}

impl GeneratedGraphPage {
    pub fn file_name(&self) -> String {
        self.kind.file_name(self.focal_id)
    }
}

/// Render `network` as a standalone HTML page.
pub fn render_graph_page(
    network: &VisNetwork,
    graph: &EgoGraph,
    kind: PageKind,
    title: &str,
) -> EthlensResult<GeneratedGraphPage> {
    let focal_id = graph
        .focal
        .first()
        .copied()
        .ok_or_else(|| EthlensError::validation("graph page needs at least one focal node"))?;

    let mut context = Context::new();
    context.insert("title", title);
    context.insert("node_count", &network.nodes.len());
    context.insert("edge_count", &network.edges.len());
    context.insert("expansion", graph.expansion.as_str());
    context.insert("network_json", &script_safe_json(network)?);

    let html = Tera::one_off(GRAPH_PAGE_TEMPLATE, &context, true)
        .map_err(|e| EthlensError::Template(e.to_string()))?;

    Ok(GeneratedGraphPage { kind, focal_id, html })
}

/// JSON that can sit inside a `<script>` element without closing it.
fn script_safe_json<T: Serialize>(value: &T) -> EthlensResult<String> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Write `page` under `dir`, creating it if needed. Returns the file path.
pub fn write_graph_page(page: &GeneratedGraphPage, dir: &Path) -> EthlensResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(page.file_name());
    std::fs::write(&path, &page.html)?;
    info!(path = %path.display(), "Wrote graph page");
    Ok(path)
}
