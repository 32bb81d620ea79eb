//! Nearest-neighbor ranking over an embedding matrix.
//!
//! A query ranks every other row by distance to the query row. Ties are
//! broken by row index so rankings are reproducible. A candidate mask is a
//! post-filter: it removes rows from the full ranking without re-ranking
//! the remainder.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

use ethlens_core::{EthlensError, EthlensResult, Metric};

use crate::matrix::{EmbeddingArtifact, EmbeddingMatrix};
use crate::metric::{distance, norm};

/// One ranked result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub address: String,
    /// Row in the embedding matrix.
    pub index: usize,
    /// Distance to the query row under the requested metric.
    pub score: f64,
}

/// Row-aligned embedding matrix and address list.
#[derive(Debug, Clone)]
pub struct NearestNeighborIndex {
    matrix: EmbeddingMatrix,
    addresses: Vec<String>,
    by_address: HashMap<String, usize>,
}

impl NearestNeighborIndex {
    /// Pair `matrix` rows with `addresses` positionally.
    pub fn build(matrix: EmbeddingMatrix, addresses: Vec<String>) -> EthlensResult<Self> {
        if matrix.rows() != addresses.len() {
            return Err(EthlensError::LengthMismatch {
                left_name: "embedding matrix",
                left: matrix.rows(),
                right_name: "address list",
                right: addresses.len(),
            });
        }

        let mut by_address = HashMap::with_capacity(addresses.len());
        for (i, address) in addresses.iter().enumerate() {
            if by_address.insert(address.clone(), i).is_some() {
                return Err(EthlensError::DuplicateAddress(address.clone()));
            }
        }

        Ok(Self {
            matrix,
            addresses,
            by_address,
        })
    }

    pub fn from_artifact(artifact: EmbeddingArtifact) -> EthlensResult<Self> {
        let matrix = EmbeddingMatrix::from_rows(artifact.vectors)?;
        Self::build(matrix, artifact.addresses)
    }

    /// Load and validate the JSON artifact at `path`.
    pub fn load(path: &Path) -> EthlensResult<Self> {
        Self::from_artifact(EmbeddingArtifact::load(path)?)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.matrix.dim()
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// Row index of `address`. Matching is exact and case-sensitive.
    pub fn index_of(&self, address: &str) -> EthlensResult<usize> {
        self.by_address
            .get(address)
            .copied()
            .ok_or_else(|| EthlensError::AddressNotFound(address.to_string()))
    }

    /// Candidate mask for a list of addresses; unknown addresses are an error.
    pub fn mask_for_addresses<S: AsRef<str>>(&self, addresses: &[S]) -> EthlensResult<HashSet<usize>> {
        addresses.iter().map(|a| self.index_of(a.as_ref())).collect()
    }

    /// Every other row ranked by distance to `row`.
    fn rank(&self, row: usize, metric: Metric) -> EthlensResult<Vec<(usize, f64)>> {
        let query = self.matrix.row(row);
        let query_norm = norm(query);
        if metric == Metric::Cosine && query_norm == 0.0 {
            return Err(EthlensError::DegenerateVector(format!(
                "'{}' has a zero embedding; cosine distance is undefined",
                self.addresses[row]
            )));
        }

        let mut ranked: Vec<(usize, f64)> = self
            .matrix
            .iter_rows()
            .enumerate()
            .filter(|(i, _)| *i != row)
            .map(|(i, candidate)| (i, distance(metric, query, query_norm, candidate)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        Ok(ranked)
    }

    /// Up to `k` nearest rows to `address`, nearest first.
    ///
    /// With a non-empty `mask`, only rows in the mask are returned, in their
    /// order from the unmasked ranking.
    pub fn query(
        &self,
        address: &str,
        k: usize,
        metric: Metric,
        mask: &HashSet<usize>,
    ) -> EthlensResult<Vec<Neighbor>> {
        let row = self.index_of(address)?;
        let ranked = self.rank(row, metric)?;

        let neighbors: Vec<Neighbor> = ranked
            .into_iter()
            .filter(|(i, _)| mask.is_empty() || mask.contains(i))
            .take(k)
            .map(|(index, score)| Neighbor {
                address: self.addresses[index].clone(),
                index,
                score,
            })
            .collect();

        debug!(
            address,
            k,
            metric = %metric,
            mask = mask.len(),
            returned = neighbors.len(),
            "Ranked neighbors"
        );
        Ok(neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::euclidean;

    fn index(rows: Vec<Vec<f32>>) -> NearestNeighborIndex {
        let addresses = (0..rows.len()).map(|i| format!("0x{i}")).collect();
        NearestNeighborIndex::build(EmbeddingMatrix::from_rows(rows).unwrap(), addresses).unwrap()
    }

    fn no_mask() -> HashSet<usize> {
        HashSet::new()
    }

    #[test]
    fn test_three_row_scenario() {
        let idx = index(vec![vec![0.0, 0.0], vec![3.0, 4.0], vec![1.0, 1.0]]);
        let result = idx.query("0x0", 1, Metric::Euclidean, &no_mask()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].index, 2);
        assert_eq!(result[0].address, "0x2");
        assert!((result[0].score - 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_ranking_is_sorted_and_excludes_self() {
        let rows = vec![
            vec![0.5, -1.0, 2.0],
            vec![3.0, 0.0, 1.0],
            vec![0.4, -1.0, 2.1],
            vec![-4.0, 2.0, 0.0],
            vec![1.0, 1.0, 1.0],
        ];
        let idx = index(rows.clone());

        for k in [0, 2, 4, 10] {
            let result = idx.query("0x0", k, Metric::Euclidean, &no_mask()).unwrap();
            assert_eq!(result.len(), k.min(4));
            assert!(result.iter().all(|n| n.index != 0));
            for n in &result {
                assert!((n.score - euclidean(&rows[0], &rows[n.index])).abs() < 1e-9);
            }
            assert!(result.windows(2).all(|w| w[0].score <= w[1].score));
        }
    }

    #[test]
    fn test_ties_break_by_row_index() {
        let idx = index(vec![vec![0.0], vec![1.0], vec![-1.0], vec![1.0]]);
        let result = idx.query("0x0", 3, Metric::Euclidean, &no_mask()).unwrap();
        let order: Vec<usize> = result.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_mask_is_a_post_filter() {
        let idx = index(vec![vec![0.0], vec![5.0], vec![1.0], vec![3.0], vec![2.0], vec![4.0]]);
        let full = idx.query("0x0", 10, Metric::Euclidean, &no_mask()).unwrap();
        let mask: HashSet<usize> = [5, 1, 3].into_iter().collect();
        let masked = idx.query("0x0", 5, Metric::Euclidean, &mask).unwrap();

        let expected: Vec<usize> = full.iter().map(|n| n.index).filter(|i| mask.contains(i)).collect();
        let got: Vec<usize> = masked.iter().map(|n| n.index).collect();
        assert_eq!(got, expected);
        assert_eq!(got, vec![3, 5, 1]);

        let truncated = idx.query("0x0", 2, Metric::Euclidean, &mask).unwrap();
        assert_eq!(truncated.len(), 2);
    }

    #[test]
    fn test_mask_with_only_self_returns_nothing() {
        let idx = index(vec![vec![0.0], vec![1.0]]);
        let mask = idx.mask_for_addresses(&["0x0"]).unwrap();
        assert!(idx.query("0x0", 5, Metric::Euclidean, &mask).unwrap().is_empty());
    }

    #[test]
    fn test_cosine_ranking_and_zero_vectors() {
        let idx = index(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![2.0, 0.1], vec![0.0, 0.0]]);
        let result = idx.query("0x0", 3, Metric::Cosine, &no_mask()).unwrap();
        let order: Vec<usize> = result.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![2, 1, 3]);
        assert_eq!(result[2].score, 2.0);

        let err = idx.query("0x3", 3, Metric::Cosine, &no_mask()).unwrap_err();
        assert!(matches!(err, EthlensError::DegenerateVector(_)));
        assert!(err.is_invalid_request());

        // Euclidean is defined for the zero row.
        assert_eq!(idx.query("0x3", 3, Metric::Euclidean, &no_mask()).unwrap().len(), 3);
    }

    #[test]
    fn test_lookup_errors() {
        let idx = index(vec![vec![0.0], vec![1.0]]);
        let err = idx.query("0X0", 1, Metric::Euclidean, &no_mask()).unwrap_err();
        assert!(err.is_not_found());
        assert!(idx.mask_for_addresses(&["0x1", "0xdead"]).is_err());
        assert_eq!(idx.mask_for_addresses(&["0x1"]).unwrap(), HashSet::from([1]));
    }

    #[test]
    fn test_build_validation() {
        let matrix = EmbeddingMatrix::from_rows(vec![vec![0.0], vec![1.0]]).unwrap();
        let err = NearestNeighborIndex::build(matrix.clone(), vec!["a".into()]).unwrap_err();
        assert!(matches!(err, EthlensError::LengthMismatch { left: 2, right: 1, .. }));

        let err = NearestNeighborIndex::build(matrix, vec!["a".into(), "a".into()]).unwrap_err();
        assert!(matches!(err, EthlensError::DuplicateAddress(_)));
    }

    #[test]
    fn test_build_zero_dimension_rows() {
        let matrix = EmbeddingMatrix::from_rows(vec![vec![], vec![]]).unwrap();
        let idx = NearestNeighborIndex::build(matrix, vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.dim(), 0);

        let neighbors = idx.query("a", 5, Metric::Euclidean, &no_mask()).unwrap();
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].address, "b");
        assert_eq!(neighbors[0].score, 0.0);
    }

    #[test]
    fn test_load_from_artifact_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embeddings.json");
        std::fs::write(
            &path,
            r#"{"addresses": ["0xa", "0xb", "0xc"], "vectors": [[0, 0], [1, 1], [5, 5]]}"#,
        )
        .unwrap();

        let idx = NearestNeighborIndex::load(&path).unwrap();
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.dim(), 2);
        let result = idx.query("0xc", 1, Metric::Euclidean, &no_mask()).unwrap();
        assert_eq!(result[0].address, "0xb");
    }
}
