//! Graph table build command.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use ethlens_core::Config;

use super::load_graph;

#[derive(Args)]
pub struct BuildArgs {
    /// Window start, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Window end, exclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Rebuild tables even if their files exist
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: BuildArgs, mut config: Config) -> Result<()> {
    if let Some(start) = args.start {
        config.window.start = start;
    }
    if let Some(end) = args.end {
        config.window.end = end;
    }
    config.validate()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Building graph tables...");

    let tables = load_graph(&config, args.force);
    spinner.finish_and_clear();
    let tables = tables?;

    let window = config.window.to_window()?;
    let state = |built: bool| if built { "built".green() } else { "reused".dimmed() };

    println!(
        "{} {} nodes ({}) {}",
        "✓".green().bold(),
        tables.nodes.len().to_string().bold(),
        state(tables.nodes_built),
        config.data.nodes.display()
    );
    println!(
        "{} {} edges, {} transactions ({}) {}",
        "✓".green().bold(),
        tables.edges.len().to_string().bold(),
        tables.edges.transaction_count(),
        state(tables.edges_built),
        config.data.edges_path(&window).display()
    );
    Ok(())
}
