//! Dataset loading and persistence.
//!
//! Tables are plain CSV files whose column names match the rest of the
//! toolchain (`hash, from_address, to_address, value, block_timestamp` for
//! transactions, `address, type` for node types). Ground-truth lists are
//! line-oriented text files.

pub mod raw;

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

use crate::address::model::{AddressMetadata, NodeType};
use crate::config::Config;
use crate::error::{EthlensError, EthlensResult};
use crate::transaction::model::Transaction;

pub use raw::{prepare_raw, PrepareResult};

/// Load the transaction table.
///
/// Extra columns (such as a leading row-index column) are ignored.
pub fn load_transactions(path: &Path) -> EthlensResult<Vec<Transaction>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut transactions = Vec::new();
    for row in reader.deserialize() {
        transactions.push(row?);
    }
    info!(path = %path.display(), count = transactions.len(), "Loaded transactions");
    Ok(transactions)
}

/// Write the transaction table.
pub fn write_transactions(path: &Path, transactions: &[Transaction]) -> EthlensResult<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for tx in transactions {
        writer.serialize(tx)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), count = transactions.len(), "Wrote transactions");
    Ok(())
}

/// Load the phishing ground truth: one address per line.
pub fn load_phishing(path: &Path) -> EthlensResult<HashSet<String>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(parse_phishing(&raw))
}

pub fn parse_phishing(raw: &str) -> HashSet<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load de-anonymization groups: comma-separated addresses per line.
pub fn load_pair_groups(path: &Path, line_stride: usize) -> EthlensResult<Vec<Vec<String>>> {
    let raw = std::fs::read_to_string(path)?;
    parse_pair_groups(&raw, line_stride)
}

/// Parse de-anonymization groups, keeping every `line_stride`-th line from the first.
pub fn parse_pair_groups(raw: &str, line_stride: usize) -> EthlensResult<Vec<Vec<String>>> {
    if line_stride == 0 {
        return Err(EthlensError::validation("line stride must be at least 1"));
    }

    let groups = raw
        .lines()
        .step_by(line_stride)
        .map(|line| {
            line.split(',')
                .map(str::trim)
                .filter(|member| !member.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|group| !group.is_empty())
        .collect();

    Ok(groups)
}

#[derive(Deserialize)]
struct NodeTypeRow {
    address: String,
    #[serde(rename = "type")]
    node_type: String,
}

/// Load the `address,type` lookup table.
pub fn load_node_types(path: &Path) -> EthlensResult<HashMap<String, NodeType>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut table = HashMap::new();
    for row in reader.deserialize() {
        let row: NodeTypeRow = row?;
        table.insert(row.address, row.node_type.parse()?);
    }
    debug!(path = %path.display(), count = table.len(), "Loaded node types");
    Ok(table)
}

/// Load every ground-truth side table named in the configuration.
pub fn load_metadata(config: &Config) -> EthlensResult<AddressMetadata> {
    let phishing = load_phishing(&config.data.phishing)?;
    let pair_groups = load_pair_groups(&config.data.pairs, config.pairs.line_stride)?;
    let node_types = match &config.data.node_types {
        Some(path) => Some(load_node_types(path)?),
        None => None,
    };

    info!(
        phishing = phishing.len(),
        pair_groups = pair_groups.len(),
        node_types = node_types.as_ref().map_or(0, HashMap::len),
        "Loaded address metadata"
    );

    Ok(AddressMetadata {
        phishing,
        pair_groups,
        node_types,
    })
}

pub(crate) fn ensure_parent(path: &Path) -> EthlensResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_transactions_round_trip_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/eth_data.csv");
        let txs = vec![Transaction {
            hash: "0xabc".to_string(),
            from_address: "0x01".to_string(),
            to_address: "0x02".to_string(),
            value: 1.5,
            timestamp: Utc.with_ymd_and_hms(2019, 5, 6, 7, 8, 9).unwrap(),
        }];

        write_transactions(&path, &txs).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("hash,from_address,to_address,value,block_timestamp"));
        assert!(raw.contains("2019-05-06 07:08:09"));
        assert_eq!(load_transactions(&path).unwrap(), txs);
    }

    #[test]
    fn test_load_transactions_ignores_index_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eth_data.csv");
        std::fs::write(
            &path,
            ",hash,from_address,to_address,value,block_timestamp\n0,0x1,a,b,2.0,2018-01-01 00:00:00\n",
        )
        .unwrap();
        let txs = load_transactions(&path).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].to_address, "b");
    }

    #[test]
    fn test_parse_phishing_skips_blank_lines() {
        let set = parse_phishing("0xa\n\n  0xb  \n");
        assert_eq!(set.len(), 2);
        assert!(set.contains("0xb"));
    }

    #[test]
    fn test_parse_pair_groups_with_stride() {
        let raw = "a,b\nb,a\nc,d\nd,c\n";
        let groups = parse_pair_groups(raw, 2).unwrap();
        assert_eq!(groups, vec![vec!["a", "b"], vec!["c", "d"]]);

        let all = parse_pair_groups(raw, 1).unwrap();
        assert_eq!(all.len(), 4);
        assert!(parse_pair_groups(raw, 0).is_err());
    }

    #[test]
    fn test_load_node_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.csv");
        std::fs::write(&path, "address,type\n0xa,eoa\n0xb,contract\n").unwrap();
        let table = load_node_types(&path).unwrap();
        assert_eq!(table["0xa"], NodeType::Eoa);
        assert_eq!(table["0xb"], NodeType::Contract);
    }
}
