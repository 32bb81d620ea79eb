//! Web server command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use ethlens_core::Config;
use ethlens_web::{AppState, Dataset};

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (defaults to `server.port`)
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to (defaults to `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file used with --log
    #[arg(long, default_value = "logs/ethlens-serve.log")]
    pub log_file: PathBuf,
}

pub async fn execute(args: ServeArgs, config: Config) -> Result<()> {
    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    let dataset = tokio::task::spawn_blocking(move || Dataset::load(config))
        .await?
        .context("Failed to load dataset")?;
    let neighbors = dataset.neighbors.is_some();

    println!();
    println!("  {} {}", "ethlens".cyan().bold(), "Web Server".bold());
    println!();
    println!("  {}  http://{}:{}", "Dashboard".green(), host, port);
    println!("  {}       http://{}:{}/api", "API".green(), host, port);
    if !neighbors {
        println!("  {}", "Neighbor queries disabled: no embedding artifact".yellow());
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    ethlens_web::run_server(AppState::new(dataset), &host, port).await?;

    Ok(())
}
