//! Raw export preparation command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use ethlens_core::dataset::prepare_raw;
use ethlens_core::Config;

#[derive(Args)]
pub struct PrepareArgs {
    /// Raw headerless export (defaults to `data.raw_transactions`)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Transaction table to write (defaults to `data.transactions`)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: PrepareArgs, config: &Config) -> Result<()> {
    let input = args.input.unwrap_or_else(|| config.data.raw_transactions.clone());
    let output = args.output.unwrap_or_else(|| config.data.transactions.clone());

    let result = prepare_raw(&input, &output)
        .with_context(|| format!("Failed to prepare {}", input.display()))?;

    println!(
        "{} Wrote {} transactions to {}",
        "✓".green().bold(),
        result.written.to_string().bold(),
        output.display()
    );
    if result.skipped > 0 {
        println!(
            "  {}",
            format!("{} contract-creation rows without a sender or recipient skipped", result.skipped).dimmed()
        );
    }
    Ok(())
}
