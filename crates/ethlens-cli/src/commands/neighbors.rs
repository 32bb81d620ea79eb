//! Nearest-neighbor command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ethlens_core::{Config, Metric};
use ethlens_embedding::NearestNeighborIndex;
use ethlens_graph::NodeTable;

use crate::output;

#[derive(Args)]
pub struct NeighborsArgs {
    /// Query address (exact match)
    pub address: String,

    /// Number of neighbors (defaults to `neighbors.top_k`)
    #[arg(short)]
    pub k: Option<usize>,

    /// Distance metric: euclidean or cosine
    #[arg(long)]
    pub metric: Option<Metric>,

    /// Only return these addresses (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub mask: Vec<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: NeighborsArgs, config: &Config) -> Result<()> {
    let path = &config.data.embeddings;
    let index = NearestNeighborIndex::load(path)
        .with_context(|| format!("Failed to load embeddings from {}", path.display()))?;

    let k = args.k.unwrap_or(config.neighbors.top_k);
    let metric = args.metric.unwrap_or(config.neighbors.metric);
    let mask = index.mask_for_addresses(&args.mask)?;

    let neighbors = index.query(&args.address, k, metric, &mask)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&neighbors)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        "Nearest neighbors of".bold(),
        args.address.cyan().bold(),
        format!("({}, k = {})", metric, k).dimmed()
    );
    println!();

    // Labels are optional; the node table may not be built yet.
    let nodes = if config.data.nodes.exists() {
        NodeTable::load_csv(&config.data.nodes).ok()
    } else {
        None
    };
    output::print_neighbors_table(&neighbors, nodes.as_ref());
    Ok(())
}
