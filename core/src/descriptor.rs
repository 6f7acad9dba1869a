//! Topology and strategy descriptors.
//!
//! Descriptors are the static configuration the engine is fed at startup:
//! a node list, a directed edge list and a strategy list, all JSON. Layout
//! data (coordinates, ports) is accepted and ignored.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{DescriptorError, Result};
use crate::graph::{Edge, Graph, NodeInfo};
use crate::strategy::{Hop, Route, Strategy, StrategyId};
use crate::traversal::SearchMode;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopologyDescriptor {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_end: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub source: EdgeEnd,
    pub target: EdgeEnd,
}

/// An edge endpoint: a bare node id, or a `{cell, port}` attachment.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EdgeEnd {
    Node(String),
    Port {
        cell: String,
        #[serde(default)]
        port: Option<String>,
    },
}

impl EdgeEnd {
    pub fn node(&self) -> &str {
        match self {
            EdgeEnd::Node(id) => id,
            EdgeEnd::Port { cell, .. } => cell,
        }
    }
}

/// A strategy record in either of its two shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StrategyRecord {
    Hops(HopStrategyRecord),
    Waypoints(WaypointStrategyRecord),
}

/// Explicit route: `sourceNode`, badge `targetNodes`, and the hops to resolve.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HopStrategyRecord {
    pub strategy_id: StrategyId,
    pub source_node: String,
    #[serde(default)]
    pub target_nodes: Vec<String>,
    pub edges: Vec<HopRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HopRecord {
    pub source: String,
    pub target: String,
}

/// Ordered waypoint query from `source` through `targets`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointStrategyRecord {
    pub strategy_id: StrategyId,
    pub source: String,
    pub targets: Vec<String>,
    #[serde(default)]
    pub mode: SearchMode,
}

impl TopologyDescriptor {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build the topology snapshot.
    ///
    /// Edges without an id are named `e<n>`, `n` being their 1-based position
    /// in the descriptor. Edge order is preserved.
    pub fn into_graph(self) -> Result<Graph> {
        let mut graph = Graph::with_capacity(self.nodes.len(), self.edges.len());

        for node in self.nodes {
            if node.id.is_empty() {
                return Err(DescriptorError::EmptyId { what: "node" });
            }
            if graph.contains_node(&node.id) {
                return Err(DescriptorError::DuplicateNode { id: node.id });
            }
            let info = NodeInfo {
                label: node.label.unwrap_or_else(|| node.id.clone()),
                kind: node.kind,
                is_end: node.is_end,
            };
            graph.add_node(node.id, info);
        }

        let mut edge_ids: HashSet<String> = HashSet::with_capacity(self.edges.len());
        for (i, edge) in self.edges.into_iter().enumerate() {
            let (source, target) = (edge.source.node(), edge.target.node());
            if source.is_empty() || target.is_empty() {
                return Err(DescriptorError::EmptyId { what: "edge endpoint" });
            }
            let id = match edge.id {
                Some(id) if id.is_empty() => return Err(DescriptorError::EmptyId { what: "edge" }),
                Some(id) => id,
                None => format!("e{}", i + 1),
            };
            if !edge_ids.insert(id.clone()) {
                return Err(DescriptorError::DuplicateEdge { id });
            }
            graph.add_edge(Edge::new(id, source, target));
        }

        debug!(nodes = graph.node_count(), edges = graph.edge_count(), "topology loaded");
        Ok(graph)
    }
}

impl StrategyRecord {
    pub fn id(&self) -> StrategyId {
        match self {
            StrategyRecord::Hops(r) => r.strategy_id,
            StrategyRecord::Waypoints(r) => r.strategy_id,
        }
    }

    pub fn into_strategy(self) -> Result<Strategy> {
        match self {
            StrategyRecord::Hops(r) => {
                if r.source_node.is_empty() {
                    return Err(DescriptorError::EmptyId { what: "strategy start" });
                }
                Ok(Strategy {
                    id: r.strategy_id,
                    start: r.source_node,
                    targets: r.target_nodes,
                    route: Route::Hops(r.edges.into_iter().map(|h| Hop::new(h.source, h.target)).collect()),
                })
            }
            StrategyRecord::Waypoints(r) => {
                if r.source.is_empty() {
                    return Err(DescriptorError::EmptyId { what: "strategy start" });
                }
                let before = r.targets.len();
                let targets = dedup_first(r.targets);
                if targets.len() != before {
                    warn!(strategy = r.strategy_id, "repeated waypoint targets collapsed");
                }
                Ok(Strategy {
                    id: r.strategy_id,
                    start: r.source,
                    targets,
                    route: Route::Waypoints(r.mode),
                })
            }
        }
    }
}

/// Keep the first occurrence of every id, preserving order.
fn dedup_first(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// Parse a topology descriptor straight into a graph snapshot.
pub fn parse_topology(text: &str) -> Result<Graph> {
    TopologyDescriptor::from_json(text)?.into_graph()
}

/// Parse a strategy descriptor array. Strategy ids must be unique.
pub fn parse_strategies(text: &str) -> Result<Vec<Strategy>> {
    let records: Vec<StrategyRecord> = serde_json::from_str(text)?;
    let mut ids = HashSet::with_capacity(records.len());
    let mut strategies = Vec::with_capacity(records.len());
    for record in records {
        if !ids.insert(record.id()) {
            return Err(DescriptorError::DuplicateStrategy { id: record.id() });
        }
        strategies.push(record.into_strategy()?);
    }
    debug!(strategies = strategies.len(), "strategies loaded");
    Ok(strategies)
}
