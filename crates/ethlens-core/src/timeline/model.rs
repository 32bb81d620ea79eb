//! Time-series models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EthlensError;

/// Bucket width of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "H")]
    Hourly,
    #[default]
    #[serde(rename = "D")]
    Daily,
    #[serde(rename = "M")]
    Monthly,
}

impl Frequency {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Hourly => "H",
            Self::Daily => "D",
            Self::Monthly => "M",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hourly => "Hourly",
            Self::Daily => "Daily",
            Self::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frequency {
    type Err = EthlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "H" | "h" | "hourly" | "Hourly" => Ok(Self::Hourly),
            "D" | "d" | "daily" | "Daily" => Ok(Self::Daily),
            "M" | "m" | "monthly" | "Monthly" => Ok(Self::Monthly),
            other => Err(EthlensError::unsupported("frequency", other)),
        }
    }
}

/// Transaction count for one bucket, labelled by the bucket's start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub start: DateTime<Utc>,
    pub count: usize,
}

/// Activity profile of an account by hour of day and day of week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityProfile {
    pub address: String,
    /// Transactions sent in each hour of the day (UTC), index 0 = 00:00.
    pub hourly: [usize; 24],
    /// Transactions sent on each weekday, index 0 = Monday.
    pub weekly: [usize; 7],
}
