//! TOML configuration.
//!
//! Every section has defaults, so a missing file or a partial file is valid.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::address::model::PairConflictPolicy;
use crate::error::{EthlensError, EthlensResult};
use crate::options::{Expansion, Metric};
use crate::transaction::model::TimeWindow;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ethlens.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub window: WindowConfig,
    pub graph: GraphConfig,
    pub pairs: PairsConfig,
    pub neighbors: NeighborsConfig,
    pub server: ServerConfig,
}

/// Input and output file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory for derived tables (node table, per-window edge tables).
    pub dir: PathBuf,
    /// Headerless raw export consumed by `prepare`.
    pub raw_transactions: PathBuf,
    pub transactions: PathBuf,
    pub nodes: PathBuf,
    pub phishing: PathBuf,
    pub pairs: PathBuf,
    pub node_types: Option<PathBuf>,
    pub embeddings: PathBuf,
    /// Where rendered graph pages are written.
    pub pages: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            raw_transactions: PathBuf::from("../EthereumDataset/phishing_deanony_2hop_transaction.csv"),
            transactions: PathBuf::from("data/eth_data.csv"),
            nodes: PathBuf::from("data/address_data.csv"),
            phishing: PathBuf::from("../EthereumDataset/exp_phishing_eoa.txt"),
            pairs: PathBuf::from("../EthereumDataset/exp_ENS_pairs.txt"),
            node_types: Some(PathBuf::from("../EthereumDataset/AIC_node_type.txt")),
            embeddings: PathBuf::from("data/embeddings.json"),
            pages: PathBuf::from("outputs/selections"),
        }
    }
}

impl DataConfig {
    /// Edge table path for a window, e.g. `data/edges_2017-06-22_2022-03-01.csv`.
    pub fn edges_path(&self, window: &TimeWindow) -> PathBuf {
        self.dir.join(format!("edges_{}.csv", window.label()))
    }
}

/// Default edge-table window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2017, 6, 22).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2022, 3, 1).unwrap_or_default(),
        }
    }
}

impl WindowConfig {
    pub fn to_window(&self) -> EthlensResult<TimeWindow> {
        TimeWindow::from_dates(self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub radius: u32,
    pub expansion: Expansion,
    pub pair_conflict: PairConflictPolicy,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            radius: 2,
            expansion: Expansion::Forward,
            pair_conflict: PairConflictPolicy::FirstMatch,
        }
    }
}

/// Reader settings for the de-anonymization pair file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairsConfig {
    /// Read every n-th line, starting with the first.
    pub line_stride: usize,
}

impl Default for PairsConfig {
    fn default() -> Self {
        Self { line_stride: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborsConfig {
    pub metric: Metric,
    pub top_k: usize,
}

impl Default for NeighborsConfig {
    fn default() -> Self {
        Self {
            metric: Metric::Euclidean,
            top_k: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
        }
    }
}

impl Config {
    /// Check cross-field constraints.
    pub fn validate(&self) -> EthlensResult<()> {
        if self.window.start >= self.window.end {
            return Err(EthlensError::Config(format!(
                "window.start ({}) must be before window.end ({})",
                self.window.start, self.window.end
            )));
        }
        if self.graph.radius != 2 {
            return Err(EthlensError::Config(format!(
                "graph.radius must be 2, got {}",
                self.graph.radius
            )));
        }
        if self.neighbors.top_k == 0 {
            return Err(EthlensError::Config("neighbors.top_k must be at least 1".to_string()));
        }
        if self.pairs.line_stride == 0 {
            return Err(EthlensError::Config("pairs.line_stride must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Parse and validate a configuration document.
pub fn parse_config(raw: &str) -> EthlensResult<Config> {
    let config: Config = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}

/// Load the configuration at `path`, falling back to defaults if it does not exist.
pub fn load_config(path: impl AsRef<Path>) -> EthlensResult<Config> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "No configuration file, using defaults");
        return Ok(Config::default());
    }

    let raw = std::fs::read_to_string(path)?;
    let config = parse_config(&raw)?;
    debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}
