//! Dense embedding matrix and its JSON artifact.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use ethlens_core::{EthlensError, EthlensResult};

/// On-disk form: an address list and one vector per address, row-aligned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingArtifact {
    pub addresses: Vec<String>,
    pub vectors: Vec<Vec<f32>>,
}

impl EmbeddingArtifact {
    pub fn load(path: &Path) -> EthlensResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let artifact: Self = serde_json::from_str(&raw)?;
        info!(
            path = %path.display(),
            rows = artifact.vectors.len(),
            "Loaded embedding artifact"
        );
        Ok(artifact)
    }

    pub fn save(&self, path: &Path) -> EthlensResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }
}

/// Row-major `rows × dim` matrix of finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    rows: usize,
    dim: usize,
    data: Vec<f32>,
}

impl EmbeddingMatrix {
    /// Build from rows, which must share one dimension and hold only finite values.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> EthlensResult<Self> {
        let dim = rows.first().map_or(0, Vec::len);
        let row_count = rows.len();
        let mut data = Vec::with_capacity(rows.len() * dim);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(EthlensError::validation(format!(
                    "embedding row {} has dimension {}, expected {}",
                    i,
                    row.len(),
                    dim
                )));
            }
            if let Some(bad) = row.iter().find(|v| !v.is_finite()) {
                return Err(EthlensError::validation(format!(
                    "embedding row {} contains non-finite value {}",
                    i, bad
                )));
            }
            data.extend(row);
        }

        Ok(Self {
            rows: row_count,
            dim,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        (0..self.rows).map(move |i| self.row(i))
    }
}
