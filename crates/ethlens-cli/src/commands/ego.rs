//! Ego-subgraph command.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use ethlens_core::{Config, Expansion};
use ethlens_graph::queries::get_ego_subgraph_for_group;
use ethlens_graph::render::{render_graph_page, to_vis_network, write_graph_page, PageKind};

use super::load_graph;
use crate::output;

#[derive(Args)]
pub struct EgoArgs {
    /// Focal address; several addresses give the union of their ego-subgraphs
    #[arg(required = true)]
    pub addresses: Vec<String>,

    /// Also write an HTML page to this directory (defaults to `data.pages`)
    #[arg(long, value_name = "DIR")]
    pub html: Option<Option<PathBuf>>,

    /// Hop-2 expansion rule (forward or symmetric)
    #[arg(long)]
    pub expansion: Option<Expansion>,

    /// Print the vis-network JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: EgoArgs, config: &Config) -> Result<()> {
    let tables = load_graph(config, false)?;
    let nodes = &tables.nodes;
    let expansion = args.expansion.unwrap_or(config.graph.expansion);

    let mut ids = Vec::with_capacity(args.addresses.len());
    for address in &args.addresses {
        ids.push(nodes.resolve(address)?);
    }
    let Some(&first) = ids.first() else {
        bail!("at least one address is required");
    };

    let ego = get_ego_subgraph_for_group(&tables.edges, &ids, config.graph.radius, expansion)?;
    let network = to_vis_network(&ego, nodes)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&network)?);
    } else {
        for &id in &ego.focal {
            output::print_record(nodes.record(id)?);
        }
        println!();
        output::print_ego_table(&ego, nodes);
    }

    if let Some(dir) = args.html {
        let dir = dir.unwrap_or_else(|| config.data.pages.clone());
        let record = nodes.record(first)?;
        let title = format!("{} ({})", args.addresses.join(", "), tables.edges.window().label());
        let page = render_graph_page(&network, &ego, PageKind::for_record(record), &title)?;
        let path = write_graph_page(&page, &dir)
            .with_context(|| format!("Failed to write graph page to {}", dir.display()))?;
        println!("{} Wrote {}", "✓".green().bold(), path.display());
    }

    Ok(())
}
