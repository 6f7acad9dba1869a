//! strategy-paths-core: waypoint path search over directed multigraphs.
//!
//! A pure Rust library that indexes a directed topology (string node ids,
//! parallel edges allowed) and enumerates the simple paths that visit an
//! ordered list of waypoints. On top of the search sit subgraph extraction
//! (routes plus the edges interconnecting the required nodes) and strategy
//! resolution (explicit hop lists with direct-edge shortcuts).
//!
//! Nothing here does I/O. Descriptors are parsed from text the caller has
//! already read; the `strategy-paths` binary handles files and output.

mod descriptor;
mod error;
mod graph;
mod path;
mod strategy;
mod subgraph;
mod traversal;

pub use descriptor::{
    parse_strategies, parse_topology, EdgeEnd, EdgeRecord, HopRecord, HopStrategyRecord, NodeRecord,
    StrategyRecord, TopologyDescriptor, WaypointStrategyRecord,
};
pub use error::{DescriptorError, ParseModeError, Result};
pub use graph::{Edge, EdgeId, Graph, GraphIndex, NodeId, NodeInfo};
pub use path::{Path, PathKind, PathSet};
pub use strategy::{
    resolve, resolve_all, resolve_strategy, Endpoint, EndpointRole, Hop, ResolvedStrategy, Route, Strategy,
    StrategyId,
};
pub use subgraph::{extract, extract_limited, induced_edges, SubgraphResult};
pub use traversal::{follows_waypoints, search, search_bounded, search_limited, SearchLimits, SearchMode};
