use anyhow::Result;
use serde::Serialize;
use strategy_paths_core::{extract, NodeId};

use crate::load::LoadedTopology;
use crate::output::{entries, print_entries, print_json, EntryView, OutputFormat};

#[derive(Debug, Serialize)]
struct ExtractReport<'a> {
    start: &'a str,
    required: &'a [NodeId],
    paths: Vec<EntryView<'a>>,
    touched_nodes: &'a [NodeId],
}

pub fn run(loaded: &LoadedTopology, start: &str, required: &[NodeId], format: OutputFormat) -> Result<()> {
    loaded.warn_unknown(std::iter::once(start).chain(required.iter().map(String::as_str)));

    let result = extract(&loaded.index, start, required, loaded.graph.edges());

    match format {
        OutputFormat::Json => print_json(&ExtractReport {
            start,
            required,
            paths: entries(&result.paths),
            touched_nodes: &result.touched_nodes,
        })?,
        OutputFormat::Text => {
            println!("subgraph from {} covering {}", start, required.join(", "));
            print_entries(&result.paths);
            if !result.touched_nodes.is_empty() {
                println!("touched: {}", result.touched_nodes.join(" "));
            }
        }
    }
    Ok(())
}
