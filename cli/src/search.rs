use anyhow::Result;
use serde::Serialize;
use strategy_paths_core::{search_limited, NodeId, SearchMode};
use tracing::warn;

use crate::load::LoadedTopology;
use crate::output::{print_json, print_entries, OutputFormat};

#[derive(Debug)]
pub struct SearchArgs {
    pub start: NodeId,
    pub waypoints: Vec<NodeId>,
    pub mode: SearchMode,
    pub max_paths: Option<usize>,
}

#[derive(Debug, Serialize)]
struct SearchReport<'a> {
    start: &'a str,
    waypoints: &'a [NodeId],
    mode: SearchMode,
    max_paths: Option<usize>,
    paths: Vec<Vec<&'a str>>,
}

pub fn run(loaded: &LoadedTopology, args: &SearchArgs, format: OutputFormat) -> Result<()> {
    loaded.warn_unknown(std::iter::once(args.start.as_str()).chain(args.waypoints.iter().map(String::as_str)));

    let paths = search_limited(&loaded.index, &args.start, &args.waypoints, args.mode, args.max_paths);
    if args.max_paths.is_some_and(|max| paths.len() >= max) {
        warn!(max_paths = ?args.max_paths, "path cap reached, result may be incomplete");
    }

    match format {
        OutputFormat::Json => print_json(&SearchReport {
            start: &args.start,
            waypoints: &args.waypoints,
            mode: args.mode,
            max_paths: args.max_paths,
            paths: paths.edge_id_sequences(),
        })?,
        OutputFormat::Text => {
            println!(
                "{} path(s) from {} via {} ({})",
                paths.len(),
                args.start,
                args.waypoints.join(", "),
                args.mode
            );
            print_entries(&paths);
        }
    }
    Ok(())
}
