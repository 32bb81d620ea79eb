//! Transaction domain models.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EthlensError, EthlensResult};

/// A single value transfer between two addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: String,
    pub from_address: String,
    pub to_address: String,
    /// Transferred value in whole ether.
    pub value: f64,
    #[serde(rename = "block_timestamp", with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
}

/// Half-open time interval `[start, end)` over block timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window, rejecting empty or inverted intervals.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> EthlensResult<Self> {
        if start >= end {
            return Err(EthlensError::validation(format!(
                "time window start {} must be before end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Window from midnight of `start` to midnight of `end` (UTC).
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> EthlensResult<Self> {
        Self::new(
            start.and_time(NaiveTime::MIN).and_utc(),
            end.and_time(NaiveTime::MIN).and_utc(),
        )
    }

    /// `start <= ts < end`.
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.start && *ts < self.end
    }

    /// Label used in per-window file names, e.g. `2017-06-22_2022-03-01`.
    pub fn label(&self) -> String {
        format!(
            "{}_{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// CSV representation of block timestamps.
///
/// Written as `YYYY-MM-DD HH:MM:SS` (UTC); RFC 3339 is also accepted on read.
pub mod timestamp_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Parse either the CSV format or RFC 3339.
    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        let raw = raw.trim();
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, FORMAT) {
            return Ok(naive.and_utc());
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
    }
}
