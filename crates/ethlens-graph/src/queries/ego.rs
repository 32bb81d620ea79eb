//! Ego-subgraph extraction.
//!
//! Collects the edges within two hops of a focal node:
//!
//! - hop 1: every edge with the focal node as source or destination;
//! - hop 2 ([`Expansion::Forward`]): the outgoing edges of every node the
//!   focal node paid. Nodes that only paid the focal node are not expanded.
//! - hop 2 ([`Expansion::Symmetric`]): every edge touching any hop-1
//!   neighbor, regardless of direction.
//!
//! Each edge appears once, tagged with the first hop that reached it.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use ethlens_core::{EthlensError, EthlensResult, Expansion};

use crate::edges::{Edge, EdgeTable};

/// The only supported neighborhood radius.
pub const EGO_RADIUS: u32 = 2;

/// An edge of an ego-subgraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EgoEdge {
    pub from_id: u32,
    pub to_id: u32,
    pub value: f64,
    pub count: u64,
    /// 1 if the edge touches a focal node, 2 otherwise.
    pub hop: u8,
    /// Display width, see [`edge_width`].
    pub width: u32,
}

impl EgoEdge {
    fn new(edge: &Edge, hop: u8) -> Self {
        Self {
            from_id: edge.from_id,
            to_id: edge.to_id,
            value: edge.value,
            count: edge.count,
            hop,
            width: edge_width(edge.value),
        }
    }
}

/// Directed neighborhood around one or more focal nodes.
#[derive(Debug, Clone, Serialize)]
pub struct EgoGraph {
    pub focal: Vec<u32>,
    pub expansion: Expansion,
    /// Ordered by `(from_id, to_id)`.
    pub edges: Vec<EgoEdge>,
}

impl EgoGraph {
    /// Every node touched by an edge, plus the focal nodes.
    pub fn node_ids(&self) -> BTreeSet<u32> {
        self.edges
            .iter()
            .flat_map(|e| [e.from_id, e.to_id])
            .chain(self.focal.iter().copied())
            .collect()
    }

    pub fn edge_pairs(&self) -> BTreeSet<(u32, u32)> {
        self.edges.iter().map(|e| (e.from_id, e.to_id)).collect()
    }

    pub fn contains_edge(&self, from_id: u32, to_id: u32) -> bool {
        self.edges.iter().any(|e| e.from_id == from_id && e.to_id == to_id)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Display width of an edge: `floor(log10(value))` clipped at 0, plus 1.
pub fn edge_width(value: f64) -> u32 {
    if value >= 1.0 && value.is_finite() {
        value.log10().floor() as u32 + 1
    } else {
        1
    }
}

/// Positions of the edges within `EGO_RADIUS` of `focal`, with their hop.
fn collect(edges: &EdgeTable, focal: u32, expansion: Expansion) -> BTreeMap<usize, u8> {
    let mut reached: BTreeMap<usize, u8> = BTreeMap::new();

    for &idx in edges.outgoing(focal).iter().chain(edges.incoming(focal)) {
        reached.insert(idx, 1);
    }

    let neighbors: BTreeSet<u32> = match expansion {
        Expansion::Forward => edges
            .outgoing(focal)
            .iter()
            .map(|&idx| edges.edge(idx).to_id)
            .collect(),
        Expansion::Symmetric => edges
            .outgoing(focal)
            .iter()
            .map(|&idx| edges.edge(idx).to_id)
            .chain(edges.incoming(focal).iter().map(|&idx| edges.edge(idx).from_id))
            .collect(),
    };

    for neighbor in neighbors {
        let incoming: &[usize] = match expansion {
            Expansion::Forward => &[],
            Expansion::Symmetric => edges.incoming(neighbor),
        };
        for &idx in edges.outgoing(neighbor).iter().chain(incoming) {
            reached.entry(idx).or_insert(2);
        }
    }

    reached
}

fn check_radius(radius: u32) -> EthlensResult<()> {
    if radius != EGO_RADIUS {
        return Err(EthlensError::unsupported("radius", radius));
    }
    Ok(())
}

/// Extract the ego-subgraph of `focal`.
pub fn get_ego_subgraph(
    edges: &EdgeTable,
    focal: u32,
    radius: u32,
    expansion: Expansion,
) -> EthlensResult<EgoGraph> {
    check_radius(radius)?;
    if !edges.contains_node(focal) {
        return Err(EthlensError::NodeNotFound(focal));
    }

    let ego_edges: Vec<EgoEdge> = collect(edges, focal, expansion)
        .into_iter()
        .map(|(idx, hop)| EgoEdge::new(edges.edge(idx), hop))
        .collect();

    debug!(focal, %expansion, edges = ego_edges.len(), "Extracted ego-subgraph");

    Ok(EgoGraph {
        focal: vec![focal],
        expansion,
        edges: ego_edges,
    })
}

/// Union of the ego-subgraphs of every node in `node_ids`.
///
/// An edge reached from several members is kept once, with the smallest hop.
pub fn get_ego_subgraph_for_group(
    edges: &EdgeTable,
    node_ids: &[u32],
    radius: u32,
    expansion: Expansion,
) -> EthlensResult<EgoGraph> {
    check_radius(radius)?;
    if node_ids.is_empty() {
        return Err(EthlensError::validation("ego-subgraph group must not be empty"));
    }

    let mut focal = Vec::with_capacity(node_ids.len());
    let mut reached: BTreeMap<usize, u8> = BTreeMap::new();

    for &id in node_ids {
        if !edges.contains_node(id) {
            return Err(EthlensError::NodeNotFound(id));
        }
        if focal.contains(&id) {
            continue;
        }
        focal.push(id);

        for (idx, hop) in collect(edges, id, expansion) {
            reached
                .entry(idx)
                .and_modify(|existing| *existing = (*existing).min(hop))
                .or_insert(hop);
        }
    }

    let ego_edges: Vec<EgoEdge> = reached
        .into_iter()
        .map(|(idx, hop)| EgoEdge::new(edges.edge(idx), hop))
        .collect();

    debug!(?focal, %expansion, edges = ego_edges.len(), "Extracted group ego-subgraph");

    Ok(EgoGraph {
        focal,
        expansion,
        edges: ego_edges,
    })
}
