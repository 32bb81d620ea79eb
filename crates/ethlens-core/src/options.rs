//! Query options shared by the graph and embedding crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EthlensError;

/// How the second hop of an ego-subgraph is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expansion {
    /// Only the outgoing edges of nodes the focal node paid.
    #[default]
    Forward,
    /// All edges touching any neighbor of the focal node.
    Symmetric,
}

impl Expansion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Symmetric => "symmetric",
        }
    }
}

impl fmt::Display for Expansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Expansion {
    type Err = EthlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forward" | "asymmetric" => Ok(Self::Forward),
            "symmetric" => Ok(Self::Symmetric),
            other => Err(EthlensError::unsupported("expansion", other)),
        }
    }
}

/// Distance metric for nearest-neighbor queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Euclidean,
    /// `1 - cosine similarity`.
    Cosine,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Cosine => "cosine",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = EthlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "euclidean" | "l2" => Ok(Self::Euclidean),
            "cosine" => Ok(Self::Cosine),
            other => Err(EthlensError::unsupported("metric", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        assert_eq!("cosine".parse::<Metric>().unwrap(), Metric::Cosine);
        assert_eq!("L2".parse::<Metric>().unwrap(), Metric::Euclidean);
        assert_eq!("symmetric".parse::<Expansion>().unwrap(), Expansion::Symmetric);
    }

    #[test]
    fn test_unknown_option_is_unsupported() {
        let err = "manhattan".parse::<Metric>().unwrap_err();
        assert!(err.is_invalid_request());
        assert_eq!(err.to_string(), "Unsupported metric: 'manhattan'");
    }
}
