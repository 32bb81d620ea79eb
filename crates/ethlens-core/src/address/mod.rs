//! Address metadata: phishing labels, de-anonymization groups, node types.

pub mod model;

use std::collections::HashMap;
use tracing::warn;

use crate::error::{EthlensError, EthlensResult};
use model::{AddressMetadata, NodeType, PairConflictPolicy};

/// Address → de-anonymization group index lookup.
#[derive(Debug, Clone, Default)]
pub struct PairIndex {
    groups: HashMap<String, usize>,
    conflicts: usize,
}

impl PairIndex {
    /// Index every member of every group.
    ///
    /// An address listed in two groups is resolved by `policy`: `FirstMatch`
    /// keeps the earlier group and logs the conflict, `Reject` fails.
    pub fn build(pair_groups: &[Vec<String>], policy: PairConflictPolicy) -> EthlensResult<Self> {
        let mut groups: HashMap<String, usize> = HashMap::new();
        let mut conflicts = 0;

        for (idx, group) in pair_groups.iter().enumerate() {
            if group.len() != 2 {
                warn!(group = idx, size = group.len(), "De-anonymization group is not a pair");
            }
            for address in group {
                match groups.get(address) {
                    Some(&first) if first != idx => {
                        if policy == PairConflictPolicy::Reject {
                            return Err(EthlensError::PairConflict {
                                address: address.clone(),
                                first,
                                second: idx,
                            });
                        }
                        warn!(address = %address, first, second = idx, "Address in several de-anonymization groups, keeping first");
                        conflicts += 1;
                    }
                    Some(_) => {}
                    None => {
                        groups.insert(address.clone(), idx);
                    }
                }
            }
        }

        Ok(Self { groups, conflicts })
    }

    /// Group index of `address`, or -1.
    pub fn pair_idx(&self, address: &str) -> i64 {
        self.groups.get(address).map_or(-1, |&idx| idx as i64)
    }

    /// Number of conflicting memberships resolved by first match.
    pub fn conflicts(&self) -> usize {
        self.conflicts
    }
}

impl AddressMetadata {
    pub fn is_phishing(&self, address: &str) -> bool {
        self.phishing.contains(address)
    }

    /// Node type of `address`.
    ///
    /// Without a node-type table every address is `Unknown`; with one, a
    /// missing address is an error.
    pub fn node_type(&self, address: &str) -> EthlensResult<NodeType> {
        match &self.node_types {
            None => Ok(NodeType::Unknown),
            Some(table) => table
                .get(address)
                .copied()
                .ok_or_else(|| EthlensError::AddressNotFound(format!("{} (node type table)", address))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_pair_idx_is_group_position() {
        let index = PairIndex::build(&groups(&[&["a", "b"], &["c", "d"]]), PairConflictPolicy::FirstMatch).unwrap();
        assert_eq!(index.pair_idx("a"), 0);
        assert_eq!(index.pair_idx("b"), 0);
        assert_eq!(index.pair_idx("d"), 1);
        assert_eq!(index.pair_idx("z"), -1);
        assert_eq!(index.conflicts(), 0);
    }

    #[test]
    fn test_first_match_keeps_earlier_group() {
        let index = PairIndex::build(&groups(&[&["a", "b"], &["a", "c"]]), PairConflictPolicy::FirstMatch).unwrap();
        assert_eq!(index.pair_idx("a"), 0);
        assert_eq!(index.pair_idx("c"), 1);
        assert_eq!(index.conflicts(), 1);
    }

    #[test]
    fn test_reject_fails_on_conflict() {
        let err = PairIndex::build(&groups(&[&["a", "b"], &["c", "a"]]), PairConflictPolicy::Reject).unwrap_err();
        match err {
            EthlensError::PairConflict { address, first, second } => {
                assert_eq!(address, "a");
                assert_eq!((first, second), (0, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_repeat_inside_one_group_is_not_a_conflict() {
        let index = PairIndex::build(&groups(&[&["a", "a"]]), PairConflictPolicy::Reject).unwrap();
        assert_eq!(index.pair_idx("a"), 0);
    }

    #[test]
    fn test_node_type_lookup() {
        let mut meta = AddressMetadata::default();
        assert_eq!(meta.node_type("x").unwrap(), NodeType::Unknown);

        meta.node_types = Some([("x".to_string(), NodeType::Contract)].into_iter().collect());
        assert_eq!(meta.node_type("x").unwrap(), NodeType::Contract);
        assert!(meta.node_type("y").unwrap_err().is_not_found());
    }

    #[test]
    fn test_node_type_parsing() {
        assert_eq!("EOA".parse::<NodeType>().unwrap(), NodeType::Eoa);
        assert_eq!("1".parse::<NodeType>().unwrap(), NodeType::Contract);
        assert!("wallet".parse::<NodeType>().is_err());
    }
}
