//! Transaction timeline command.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use colored::Colorize;

use ethlens_core::dataset::load_transactions;
use ethlens_core::timeline::model::Frequency;
use ethlens_core::timeline::{account_activity, activity_profile, count_by_bucket, within};
use ethlens_core::Config;

use crate::output;

#[derive(Args)]
pub struct TimelineArgs {
    /// Bucket width: H, D or M
    #[arg(long, default_value = "D")]
    pub freq: Frequency,

    /// Only count transactions sent by this address, and show its profile
    #[arg(long)]
    pub address: Option<String>,

    /// Keep buckets after this date
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Keep buckets before this date
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

pub fn execute(args: TimelineArgs, config: &Config) -> Result<()> {
    let path = &config.data.transactions;
    let transactions = load_transactions(path)
        .with_context(|| format!("Failed to load transactions from {}", path.display()))?;

    let buckets = match &args.address {
        Some(address) => account_activity(&transactions, address, args.freq),
        None => count_by_bucket(&transactions, args.freq),
    };
    let start = args.start.map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc());
    let end = args.end.map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc());
    let buckets = within(buckets, start, end);

    let subject = args.address.as_deref().unwrap_or("all addresses");
    println!("{} {}", format!("{} transactions of", args.freq).bold(), subject.cyan());
    println!();
    output::print_buckets(&buckets, args.freq);

    if let Some(address) = &args.address {
        println!();
        output::print_profile(&activity_profile(&transactions, address));
    }
    Ok(())
}
