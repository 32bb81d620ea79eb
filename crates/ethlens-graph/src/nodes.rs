//! Node table: dense integer ids for every address in the dataset.
//!
//! Ids are assigned by position in the lexicographically sorted set of
//! distinct sender and recipient addresses. Identical transaction sets
//! therefore always produce identical ids, and downstream tables (edge
//! tables, rendered pages) can refer to addresses by id alone.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, info, warn};

use ethlens_core::address::model::{AddressMetadata, AddressRecord, PairConflictPolicy};
use ethlens_core::address::PairIndex;
use ethlens_core::transaction::model::Transaction;
use ethlens_core::{EthlensError, EthlensResult};

/// Immutable address ↔ id mapping with per-address annotations.
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    records: Vec<AddressRecord>,
    by_address: HashMap<String, u32>,
}

impl NodeTable {
    /// Build a table from records whose ids must be exactly `0..len` in order,
    /// with addresses strictly ascending.
    pub fn from_records(records: Vec<AddressRecord>) -> EthlensResult<Self> {
        let mut by_address = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if record.id as usize != position {
                return Err(EthlensError::validation(format!(
                    "node table row {} has id {}, ids must be dense and ordered",
                    position, record.id
                )));
            }
            if by_address.insert(record.address.clone(), record.id).is_some() {
                return Err(EthlensError::DuplicateAddress(record.address.clone()));
            }
            if let Some(previous) = position.checked_sub(1).map(|p| &records[p]) {
                if previous.address > record.address {
                    return Err(EthlensError::validation(format!(
                        "node table row {} address '{}' sorts before '{}', ids must follow sorted address order",
                        position, record.address, previous.address
                    )));
                }
            }
        }
        Ok(Self { records, by_address })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[AddressRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &AddressRecord> {
        self.records.iter()
    }

    pub fn get(&self, id: u32) -> Option<&AddressRecord> {
        self.records.get(id as usize)
    }

    /// Record for `id`, or a not-found error.
    pub fn record(&self, id: u32) -> EthlensResult<&AddressRecord> {
        self.get(id).ok_or(EthlensError::NodeNotFound(id))
    }

    pub fn id_of(&self, address: &str) -> Option<u32> {
        self.by_address.get(address).copied()
    }

    /// Id for `address`, or a not-found error. Matching is exact.
    pub fn resolve(&self, address: &str) -> EthlensResult<u32> {
        self.id_of(address)
            .ok_or_else(|| EthlensError::AddressNotFound(address.to_string()))
    }

    pub fn address_of(&self, id: u32) -> Option<&str> {
        self.get(id).map(|r| r.address.as_str())
    }

    /// Record for `address`, or a not-found error.
    pub fn lookup(&self, address: &str) -> EthlensResult<&AddressRecord> {
        let id = self.resolve(address)?;
        self.record(id)
    }

    /// Ids of all addresses sharing a de-anonymization group with `id`, `id` included.
    pub fn pair_members(&self, id: u32) -> EthlensResult<Vec<u32>> {
        let record = self.record(id)?;
        if !record.is_paired() {
            return Ok(vec![id]);
        }
        Ok(self
            .records
            .iter()
            .filter(|r| r.pair_idx == record.pair_idx)
            .map(|r| r.id)
            .collect())
    }

    /// Write as CSV with columns `id,address,phish_flag,pair_idx,node_type`.
    pub fn write_csv(&self, path: &Path) -> EthlensResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        debug!(path = %path.display(), nodes = self.len(), "Wrote node table");
        Ok(())
    }

    /// Load a table previously written by [`NodeTable::write_csv`].
    pub fn load_csv(path: &Path) -> EthlensResult<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        let table = Self::from_records(records)?;
        info!(path = %path.display(), nodes = table.len(), "Loaded node table");
        Ok(table)
    }
}

/// Build the node table from every address that sends or receives a transaction.
pub fn build_nodes(
    transactions: &[Transaction],
    metadata: &AddressMetadata,
    pair_conflict: PairConflictPolicy,
) -> EthlensResult<NodeTable> {
    let addresses: BTreeSet<&str> = transactions
        .iter()
        .flat_map(|tx| [tx.from_address.as_str(), tx.to_address.as_str()])
        .collect();

    let pairs = PairIndex::build(&metadata.pair_groups, pair_conflict)?;
    if pairs.conflicts() > 0 {
        warn!(conflicts = pairs.conflicts(), "Resolved de-anonymization group conflicts by first match");
    }

    let mut records = Vec::with_capacity(addresses.len());
    for (id, address) in addresses.into_iter().enumerate() {
        records.push(AddressRecord {
            id: id as u32,
            address: address.to_string(),
            phish_flag: metadata.is_phishing(address),
            pair_idx: pairs.pair_idx(address),
            node_type: metadata.node_type(address)?,
        });
    }

    let table = NodeTable::from_records(records)?;
    info!(
        nodes = table.len(),
        phishing = table.iter().filter(|r| r.phish_flag).count(),
        paired = table.iter().filter(|r| r.is_paired()).count(),
        "Built node table"
    );
    Ok(table)
}

/// Load the node table at `path`, or build and write it if the file is absent.
pub fn load_or_build_nodes(
    path: &Path,
    transactions: &[Transaction],
    metadata: impl FnOnce() -> EthlensResult<AddressMetadata>,
    pair_conflict: PairConflictPolicy,
    force: bool,
) -> EthlensResult<NodeTable> {
    if path.exists() && !force {
        return NodeTable::load_csv(path);
    }
    let table = build_nodes(transactions, &metadata()?, pair_conflict)?;
    table.write_csv(path)?;
    Ok(table)
}
