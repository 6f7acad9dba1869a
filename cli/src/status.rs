use anyhow::Result;
use serde::Serialize;

use crate::load::LoadedTopology;
use crate::output::{print_json, OutputFormat};

#[derive(Debug, Serialize)]
struct StatusReport {
    source: String,
    nodes: usize,
    edges: usize,
    pairs: usize,
    end_nodes: usize,
    memory_bytes: usize,
    load_time_ms: f64,
}

pub fn run(loaded: &LoadedTopology, format: OutputFormat) -> Result<()> {
    let report = StatusReport {
        source: loaded.source.display().to_string(),
        nodes: loaded.graph.node_count(),
        edges: loaded.graph.edge_count(),
        pairs: loaded.index.pair_count(),
        end_nodes: loaded.graph.nodes_iter().filter(|(_, info)| info.is_end).count(),
        memory_bytes: loaded.index.memory_usage(),
        load_time_ms: loaded.load_time_ms,
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            println!("source:     {}", report.source);
            println!("nodes:      {} ({} endpoints)", report.nodes, report.end_nodes);
            println!("edges:      {}", report.edges);
            println!("pairs:      {}", report.pairs);
            println!("memory:     {} bytes", report.memory_bytes);
            println!("load time:  {:.3} ms", report.load_time_ms);
        }
    }
    Ok(())
}
