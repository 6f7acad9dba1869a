//! strategy-paths: waypoint path search and strategy resolution over a
//! topology descriptor.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use strategy_paths_core::{NodeId, SearchMode, StrategyId};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod extract;
mod load;
mod output;
mod resolve;
mod search;
mod status;

use config::{parse_max_paths, Config, Overrides, Settings};
use output::OutputFormat;

/// Find the routes through a directed topology that visit waypoints in order.
#[derive(Parser)]
#[command(name = "strategy-paths")]
#[command(author, version)]
#[command(about = "Waypoint path search and strategy resolution over a topology descriptor")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  strategy-paths --topology topology.json status
  strategy-paths --topology topology.json search validator receiver2 receiver3 --mode bfs
  strategy-paths --topology topology.json extract validator receiver1
  strategy-paths --config strategy-paths.toml resolve 3 7")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (descriptor paths, search defaults, output format)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Topology descriptor (JSON)
    #[arg(long, global = true)]
    topology: Option<PathBuf>,

    /// Strategy descriptor (JSON array)
    #[arg(long, global = true)]
    strategies: Option<PathBuf>,

    /// Output format (overrides config)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the topology and report its size
    Status,

    /// Find paths from START through every WAYPOINT in order
    Search {
        start: NodeId,

        #[arg(required = true)]
        waypoints: Vec<NodeId>,

        /// exhaustive (dfs) or first-found (bfs)
        #[arg(short, long)]
        mode: Option<SearchMode>,

        /// Stop after this many paths
        #[arg(long, value_parser = parse_max_paths)]
        max_paths: Option<usize>,
    },

    /// Routes covering REQUIRED in order, plus the edges interconnecting them
    Extract {
        start: NodeId,

        #[arg(required = true)]
        required: Vec<NodeId>,
    },

    /// Resolve strategies (all, or the given ids) into highlighted paths
    Resolve {
        ids: Vec<StrategyId>,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let (mode, max_paths) = match &cli.command {
        Commands::Search { mode, max_paths, .. } => (*mode, *max_paths),
        _ => (None, None),
    };
    let settings = Settings::layer(
        config,
        Overrides {
            topology: cli.topology,
            strategies: cli.strategies,
            format: cli.format,
            mode,
            max_paths,
        },
    );

    let loaded = load::load_topology(settings.topology_path()?)?;

    match cli.command {
        Commands::Status => status::run(&loaded, settings.format),
        Commands::Search { start, waypoints, .. } => {
            let args = search::SearchArgs {
                start,
                waypoints,
                mode: settings.mode,
                max_paths: settings.max_paths,
            };
            search::run(&loaded, &args, settings.format)
        }
        Commands::Extract { start, required } => extract::run(&loaded, &start, &required, settings.format),
        Commands::Resolve { ids } => {
            let strategies = load::load_strategies(settings.strategies_path()?)?;
            let strategies = resolve::select(strategies, &ids)?;
            resolve::run(&loaded, &strategies, settings.format)
        }
    }
}
