//! Strategy resolution: turning configured routes into highlighted path sets.
//!
//! A strategy is either an explicit list of hops, each resolved on its own,
//! or an ordered waypoint list handed to waypoint search. Display state
//! (selection, colours, badges) stays with the caller; the resolver only
//! reports which nodes are endpoints and in what order.

use serde::Serialize;
use tracing::{debug, warn};

use crate::graph::{Graph, GraphIndex, NodeId};
use crate::path::{Path, PathSet};
use crate::subgraph::extract;
use crate::traversal::{search, SearchMode};

/// Numeric strategy identifier from the strategy descriptor.
pub type StrategyId = u32;

/// One configured hop of an explicit route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hop {
    pub source: NodeId,
    pub target: NodeId,
}

impl Hop {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// How a strategy's paths are computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Resolve each hop independently and concatenate in hop order.
    Hops(Vec<Hop>),
    /// Search from the start through the strategy targets in order.
    Waypoints(SearchMode),
}

/// A user-authored route definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strategy {
    pub id: StrategyId,
    pub start: NodeId,
    pub targets: Vec<NodeId>,
    pub route: Route,
}

/// Badge role of an endpoint node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointRole {
    Start,
    /// 1-based position in the strategy's target list.
    Target(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub node: NodeId,
    pub role: EndpointRole,
}

/// A strategy after resolution: endpoints for labelling plus the paths to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedStrategy {
    pub id: StrategyId,
    pub start: Endpoint,
    pub targets: Vec<Endpoint>,
    pub paths: PathSet,
}

impl ResolvedStrategy {
    /// Start first, then targets in order.
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        std::iter::once(&self.start).chain(self.targets.iter())
    }
}

/// Compute the path set for one strategy.
///
/// Hop routes: a hop with direct edges contributes that edge bucket verbatim
/// as one entry; any other hop contributes whatever subgraph extraction from
/// its source to its target returns (possibly nothing). Waypoint routes run
/// waypoint search from the start through the targets.
pub fn resolve(index: &GraphIndex, strategy: &Strategy) -> PathSet {
    resolve_route(index, &strategy.start, &strategy.targets, &strategy.route)
}

fn resolve_route(index: &GraphIndex, start: &str, targets: &[NodeId], route: &Route) -> PathSet {
    match route {
        Route::Hops(hops) => resolve_hops(index, hops),
        Route::Waypoints(mode) => search(index, start, targets, *mode),
    }
}

fn resolve_hops(index: &GraphIndex, hops: &[Hop]) -> PathSet {
    let mut paths = PathSet::new();

    for hop in hops {
        let direct: Vec<_> = index.edges_between(&hop.source, &hop.target).cloned().collect();
        if !direct.is_empty() {
            debug!(source = hop.source.as_str(), target = hop.target.as_str(), edges = direct.len(), "direct hop");
            paths.push(Path::direct(direct));
            continue;
        }

        let sub = extract(index, &hop.source, std::slice::from_ref(&hop.target), index.edges());
        debug!(
            source = hop.source.as_str(),
            target = hop.target.as_str(),
            paths = sub.paths.len(),
            "hop resolved by extraction"
        );
        paths.extend(sub.paths);
    }

    paths
}

/// Resolve one strategy against a topology snapshot.
///
/// Targets unknown to the graph are dropped before numbering, and a waypoint
/// route searches through the remaining targets only. Returns `None`
/// when the start node is unknown or no target is known; a strategy whose
/// hops are all unreachable still resolves, with an empty path set.
pub fn resolve_strategy(graph: &Graph, index: &GraphIndex, strategy: &Strategy) -> Option<ResolvedStrategy> {
    if !graph.contains_node(&strategy.start) {
        warn!(strategy = strategy.id, start = strategy.start.as_str(), "strategy start node not in topology, skipping");
        return None;
    }

    let known: Vec<NodeId> = strategy
        .targets
        .iter()
        .filter(|t| graph.contains_node(t))
        .cloned()
        .collect();
    if known.is_empty() {
        warn!(strategy = strategy.id, "strategy has no known target nodes, skipping");
        return None;
    }

    let paths = resolve_route(index, &strategy.start, &known, &strategy.route);
    let targets = known
        .into_iter()
        .enumerate()
        .map(|(i, node)| Endpoint {
            node,
            role: EndpointRole::Target(i + 1),
        })
        .collect();

    Some(ResolvedStrategy {
        id: strategy.id,
        start: Endpoint {
            node: strategy.start.clone(),
            role: EndpointRole::Start,
        },
        targets,
        paths,
    })
}

/// Resolve every strategy in order, skipping those that cannot be anchored.
pub fn resolve_all(graph: &Graph, index: &GraphIndex, strategies: &[Strategy]) -> Vec<ResolvedStrategy> {
    strategies
        .iter()
        .filter_map(|s| resolve_strategy(graph, index, s))
        .collect()
}
