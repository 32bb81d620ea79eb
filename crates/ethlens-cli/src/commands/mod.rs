//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ethlens_core::config::DEFAULT_CONFIG_FILE;
use ethlens_core::{load_config, Config};

pub mod build;
pub mod ego;
pub mod neighbors;
pub mod prepare;
pub mod serve;
pub mod timeline;

/// ethlens - Ethereum transaction graph explorer
#[derive(Parser)]
#[command(name = "ethlens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "ETHLENS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert the raw transaction export into the transaction table
    Prepare(prepare::PrepareArgs),

    /// Build (or reuse) the node table and the edge table of a window
    Build(build::BuildArgs),

    /// Show the ego-subgraph of one address or a group of addresses
    Ego(ego::EgoArgs),

    /// Rank addresses by embedding distance
    Neighbors(neighbors::NeighborsArgs),

    /// Transaction counts over time
    Timeline(timeline::TimelineArgs),

    /// Start the dashboard web server
    Serve(serve::ServeArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let path = self
            .config
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let config = load_config(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        match self.command {
            Commands::Prepare(args) => prepare::execute(args, &config),
            Commands::Build(args) => build::execute(args, config),
            Commands::Ego(args) => ego::execute(args, &config),
            Commands::Neighbors(args) => neighbors::execute(args, &config),
            Commands::Timeline(args) => timeline::execute(args, &config),
            Commands::Serve(args) => serve::execute(args, config).await,
        }
    }
}

/// Load the graph tables, reporting what had to be built.
pub(crate) fn load_graph(config: &Config, force: bool) -> Result<ethlens_graph::GraphTables> {
    ethlens_graph::GraphTables::load(config, force).with_context(|| {
        format!(
            "Failed to load graph tables from {}",
            config.data.transactions.display()
        )
    })
}
