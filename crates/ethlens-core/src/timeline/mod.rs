//! Time-bucketed transaction counts.

pub mod model;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use std::collections::BTreeMap;

use crate::transaction::{self, model::Transaction};
use model::{ActivityProfile, Bucket, Frequency};

/// Start of the bucket containing `ts`.
pub fn bucket_start(ts: DateTime<Utc>, freq: Frequency) -> DateTime<Utc> {
    let date = ts.date_naive();
    match freq {
        Frequency::Hourly => date
            .and_hms_opt(ts.hour(), 0, 0)
            .map(|naive| naive.and_utc())
            .unwrap_or(ts),
        Frequency::Daily => date.and_time(NaiveTime::MIN).and_utc(),
        Frequency::Monthly => first_of_month(date.year(), date.month()),
    }
}

fn first_of_month(year: i32, month: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

fn next_bucket(start: DateTime<Utc>, freq: Frequency) -> DateTime<Utc> {
    match freq {
        Frequency::Hourly => start + Duration::hours(1),
        Frequency::Daily => start + Duration::days(1),
        Frequency::Monthly => {
            let (year, month) = if start.month() == 12 {
                (start.year() + 1, 1)
            } else {
                (start.year(), start.month() + 1)
            };
            first_of_month(year, month)
        }
    }
}

/// Count transactions per bucket.
///
/// Buckets are contiguous from the first to the last occupied bucket, with
/// empty buckets reported as zero.
pub fn count_by_bucket<'a, I>(transactions: I, freq: Frequency) -> Vec<Bucket>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut counts: BTreeMap<DateTime<Utc>, usize> = BTreeMap::new();
    for tx in transactions {
        *counts.entry(bucket_start(tx.timestamp, freq)).or_insert(0) += 1;
    }

    let (Some(&first), Some(&last)) = (counts.keys().next(), counts.keys().next_back()) else {
        return Vec::new();
    };

    let mut buckets = Vec::new();
    let mut cursor = first;
    while cursor <= last {
        buckets.push(Bucket {
            start: cursor,
            count: counts.get(&cursor).copied().unwrap_or(0),
        });
        cursor = next_bucket(cursor, freq);
    }
    buckets
}

/// Keep buckets strictly between `start` and `end`; a missing bound is open.
pub fn within(buckets: Vec<Bucket>, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Vec<Bucket> {
    buckets
        .into_iter()
        .filter(|b| start.map_or(true, |s| b.start > s) && end.map_or(true, |e| b.start < e))
        .collect()
}

/// Buckets of transactions sent by `address`.
pub fn account_activity(transactions: &[Transaction], address: &str, freq: Frequency) -> Vec<Bucket> {
    count_by_bucket(transaction::sent_by(transactions, address), freq)
}

/// Hour-of-day and weekday profile of transactions sent by `address`.
pub fn activity_profile(transactions: &[Transaction], address: &str) -> ActivityProfile {
    let mut hourly = [0usize; 24];
    let mut weekly = [0usize; 7];
    for tx in transaction::sent_by(transactions, address) {
        hourly[tx.timestamp.hour() as usize] += 1;
        weekly[tx.timestamp.weekday().num_days_from_monday() as usize] += 1;
    }
    ActivityProfile {
        address: address.to_string(),
        hourly,
        weekly,
    }
}
