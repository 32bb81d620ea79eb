//! Transactions and time windows.

pub mod model;

use chrono::{DateTime, Utc};
use model::{TimeWindow, Transaction};

/// Transactions whose timestamp falls inside `window`.
pub fn in_window<'a>(
    transactions: &'a [Transaction],
    window: &'a TimeWindow,
) -> impl Iterator<Item = &'a Transaction> + 'a {
    transactions.iter().filter(move |tx| window.contains(&tx.timestamp))
}

/// Transactions sent by `address` (exact, case-sensitive match).
pub fn sent_by<'a>(
    transactions: &'a [Transaction],
    address: &'a str,
) -> impl Iterator<Item = &'a Transaction> + 'a {
    transactions.iter().filter(move |tx| tx.from_address == address)
}

/// Earliest and latest timestamp, or `None` for an empty set.
pub fn time_bounds(transactions: &[Transaction]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = transactions.iter().map(|tx| tx.timestamp).min()?;
    let last = transactions.iter().map(|tx| tx.timestamp).max()?;
    Some((first, last))
}
