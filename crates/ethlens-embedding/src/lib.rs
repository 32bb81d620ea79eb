//! # Ethlens Embedding
//!
//! Nearest-neighbor ranking over precomputed address embeddings.
//!
//! ## Modules
//!
//! - [`matrix`]: the row-aligned `addresses` / `vectors` artifact
//! - [`metric`]: euclidean and cosine distances
//! - [`index`]: [`NearestNeighborIndex`] and candidate masks

pub mod index;
pub mod matrix;
pub mod metric;

pub use index::{Neighbor, NearestNeighborIndex};
pub use matrix::EmbeddingMatrix;
