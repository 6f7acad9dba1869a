use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use strategy_paths_core::{parse_strategies, parse_topology, Graph, GraphIndex, Strategy};
use tracing::{info, warn};

/// A topology snapshot plus the index built over it.
#[derive(Debug)]
pub struct LoadedTopology {
    pub graph: Graph,
    pub index: GraphIndex,
    pub source: PathBuf,
    /// Read, parse and index time.
    pub load_time_ms: f64,
}

impl LoadedTopology {
    /// The ids in `ids` that the topology does not know, in order.
    pub fn unknown_nodes<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        ids.into_iter().filter(|id| !self.graph.contains_node(id)).collect()
    }

    /// Warn about ids the topology does not know; searches just come back
    /// empty for them.
    pub fn warn_unknown<'a>(&self, ids: impl IntoIterator<Item = &'a str>) {
        for id in self.unknown_nodes(ids) {
            warn!(node = id, "node not in topology");
        }
    }
}

pub fn load_topology(path: &Path) -> Result<LoadedTopology> {
    let start = Instant::now();

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read topology file {}", path.display()))?;
    let graph = parse_topology(&text).with_context(|| format!("invalid topology file {}", path.display()))?;
    let index = graph.index();

    let load_time_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(
        source = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        load_time_ms,
        "topology loaded"
    );

    Ok(LoadedTopology {
        graph,
        index,
        source: path.to_path_buf(),
        load_time_ms,
    })
}

pub fn load_strategies(path: &Path) -> Result<Vec<Strategy>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read strategy file {}", path.display()))?;
    parse_strategies(&text).with_context(|| format!("invalid strategy file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_topology() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("topology.json");
        fs::write(&path, r#"{ "edges": [{ "source": "a", "target": "b" }, { "source": "b", "target": "c" }] }"#).unwrap();

        let loaded = load_topology(&path).unwrap();
        assert_eq!(loaded.graph.node_count(), 3);
        assert_eq!(loaded.index.edge_count(), 2);
        assert_eq!(loaded.source, path);
        assert!(loaded.load_time_ms >= 0.0);
    }

    #[test]
    fn test_unknown_nodes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("topology.json");
        fs::write(&path, r#"{ "edges": [{ "source": "a", "target": "b" }] }"#).unwrap();

        let loaded = load_topology(&path).unwrap();
        assert_eq!(loaded.unknown_nodes(["a", "x", "b", "y"]), vec!["x", "y"]);
        assert!(loaded.unknown_nodes(["b", "a"]).is_empty());
    }

    #[test]
    fn test_load_topology_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"{ "nodes": [{ "id": "a" }, { "id": "a" }] }"#).unwrap();

        let err = load_topology(&path).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("broken.json"));
        assert!(chain.contains("duplicate node id 'a'"));
    }

    #[test]
    fn test_load_strategies_missing_file() {
        let err = load_strategies(Path::new("/nonexistent/strategies.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read strategy file"));
    }
}
