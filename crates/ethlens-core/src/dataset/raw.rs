//! Preparation of the raw transaction export.
//!
//! The export is a headerless CSV with nine columns:
//! `hash, block_number, transaction_index, from_address, to_address, value,
//! gas, gas_price, block_timestamp`, where `value` is in wei and
//! `block_timestamp` is in unix seconds.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{EthlensError, EthlensResult};
use crate::transaction::model::Transaction;

/// Wei per ether.
pub const WEI_PER_ETHER: f64 = 1e18;

#[derive(Debug, Deserialize)]
struct RawRow {
    hash: String,
    _block_number: f64,
    _transaction_index: f64,
    from_address: String,
    to_address: String,
    value: f64,
    _gas: f64,
    _gas_price: f64,
    block_timestamp: i64,
}

/// Outcome of a preparation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareResult {
    pub written: usize,
    /// Rows without a sender or recipient (contract creations).
    pub skipped: usize,
}

/// Parse raw rows into time-sorted transactions.
pub fn parse_raw<R: Read>(input: R) -> EthlensResult<(Vec<Transaction>, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut transactions = Vec::new();
    let mut skipped = 0;

    for row in reader.deserialize() {
        let row: RawRow = row?;
        if row.from_address.is_empty() || row.to_address.is_empty() {
            skipped += 1;
            continue;
        }

        let timestamp = DateTime::from_timestamp(row.block_timestamp, 0).ok_or_else(|| {
            EthlensError::validation(format!(
                "transaction {} has out-of-range timestamp {}",
                row.hash, row.block_timestamp
            ))
        })?;

        transactions.push(Transaction {
            hash: row.hash,
            from_address: row.from_address,
            to_address: row.to_address,
            value: row.value / WEI_PER_ETHER,
            timestamp,
        });
    }

    // Stable: rows within the same second keep export order.
    transactions.sort_by_key(|tx| tx.timestamp);

    if skipped > 0 {
        warn!(skipped, "Skipped raw rows without sender or recipient");
    }

    Ok((transactions, skipped))
}

/// Convert the raw export at `input` into the transaction table at `output`.
pub fn prepare_raw(input: &Path, output: &Path) -> EthlensResult<PrepareResult> {
    let file = std::fs::File::open(input)?;
    let (transactions, skipped) = parse_raw(file)?;
    super::write_transactions(output, &transactions)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        written = transactions.len(),
        "Prepared transaction table"
    );

    Ok(PrepareResult {
        written: transactions.len(),
        skipped,
    })
}
