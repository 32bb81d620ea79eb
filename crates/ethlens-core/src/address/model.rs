//! Address domain models.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::EthlensError;

/// One row of the node table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub id: u32,
    pub address: String,
    #[serde(deserialize_with = "flexible_bool")]
    pub phish_flag: bool,
    /// Index of the de-anonymization group containing the address, or -1.
    pub pair_idx: i64,
    pub node_type: NodeType,
}

impl AddressRecord {
    pub fn is_paired(&self) -> bool {
        self.pair_idx >= 0
    }
}

/// Accepts `true`/`false` in any case as well as `1`/`0`.
fn flexible_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(serde::de::Error::custom(format!("invalid boolean '{}'", other))),
    }
}

/// Account kind of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Externally-owned account.
    Eoa,
    Contract,
    /// No node-type table was configured.
    Unknown,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eoa => "eoa",
            Self::Contract => "contract",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for NodeType {
    type Err = EthlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eoa" | "externally_owned" | "0" => Ok(Self::Eoa),
            "contract" | "ca" | "1" => Ok(Self::Contract),
            "unknown" => Ok(Self::Unknown),
            other => Err(EthlensError::unsupported("node type", other)),
        }
    }
}

/// What to do when an address appears in more than one de-anonymization group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairConflictPolicy {
    /// Keep the first group containing the address.
    #[default]
    FirstMatch,
    /// Fail the node-table build.
    Reject,
}

impl FromStr for PairConflictPolicy {
    type Err = EthlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first_match" | "first-match" => Ok(Self::FirstMatch),
            "reject" => Ok(Self::Reject),
            other => Err(EthlensError::unsupported("pair conflict policy", other)),
        }
    }
}

/// Ground-truth side tables used to annotate the node table.
#[derive(Debug, Clone, Default)]
pub struct AddressMetadata {
    pub phishing: HashSet<String>,
    /// De-anonymization groups in file order; usually two addresses each.
    pub pair_groups: Vec<Vec<String>>,
    /// `None` when no node-type table is configured.
    pub node_types: Option<HashMap<String, NodeType>>,
}
