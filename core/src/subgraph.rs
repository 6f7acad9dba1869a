use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::graph::{Edge, GraphIndex, NodeId};
use crate::path::{Path, PathSet};
use crate::traversal::{search_bounded, SearchLimits, SearchMode};

/// Result of subgraph extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubgraphResult {
    /// Waypoint routes, followed by one [`crate::PathKind::Induced`] entry
    /// when any edge interconnects the required nodes.
    pub paths: PathSet,
    /// Nodes touched by the waypoint routes, in first-seen order.
    pub touched_nodes: Vec<NodeId>,
}

/// Extract the routes covering `required` plus the edges interconnecting them.
///
/// Phase 1: exhaustive waypoint search from `start` through `required` in
/// order. A leading entry equal to `start` counts as already visited.
/// Phase 2: every edge of `all_edges` whose endpoints are both in
/// `required ∪ {start}` is collected into a single induced entry. Phase 2
/// runs even when phase 1 finds nothing.
pub fn extract(index: &GraphIndex, start: &str, required: &[NodeId], all_edges: &[Edge]) -> SubgraphResult {
    extract_limited(index, start, required, all_edges, SearchLimits::default())
}

/// [`extract`] with the route phase run under `limits`. The induced entry is
/// never capped.
pub fn extract_limited(
    index: &GraphIndex,
    start: &str,
    required: &[NodeId],
    all_edges: &[Edge],
    limits: SearchLimits,
) -> SubgraphResult {
    let waypoints = match required.split_first() {
        Some((first, rest)) if first == start => rest,
        _ => required,
    };

    let mut paths = search_bounded(index, start, waypoints, SearchMode::Exhaustive, limits);

    let mut seen = HashSet::new();
    let touched_nodes: Vec<NodeId> = paths
        .iter()
        .flat_map(|p| p.nodes())
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect();

    let induced = induced_edges(start, required, all_edges);
    debug!(
        start,
        required = required.len(),
        routes = paths.len(),
        induced = induced.len(),
        "subgraph extracted"
    );
    if !induced.is_empty() {
        paths.push(Path::induced(induced));
    }

    SubgraphResult { paths, touched_nodes }
}

/// Edges with both endpoints in `required ∪ {start}`, in `all_edges` order.
/// An edge id listed twice in `all_edges` is kept once.
pub fn induced_edges(start: &str, required: &[NodeId], all_edges: &[Edge]) -> Vec<Edge> {
    let members: HashSet<&str> = required
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(start))
        .collect();

    let mut ids = HashSet::new();
    all_edges
        .iter()
        .filter(|e| members.contains(e.source.as_str()) && members.contains(e.target.as_str()))
        .filter(|e| ids.insert(e.id.as_str()))
        .cloned()
        .collect()
}
