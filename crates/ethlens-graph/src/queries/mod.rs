//! Graph queries over an edge table.

pub mod ego;

pub use ego::{edge_width, get_ego_subgraph, get_ego_subgraph_for_group, EgoEdge, EgoGraph, EGO_RADIUS};
