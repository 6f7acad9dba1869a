use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ParseModeError;
use crate::graph::{Edge, GraphIndex, NodeId, Slot};
use crate::path::{Path, PathSet};

/// How waypoint search explores the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// Depth-first; every distinct simple path that satisfies the waypoints.
    #[default]
    #[serde(alias = "dfs")]
    Exhaustive,
    /// Breadth-first; the first complete path by increasing length, or nothing.
    #[serde(alias = "bfs")]
    FirstFound,
}

impl FromStr for SearchMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exhaustive" | "dfs" | "all" => Ok(SearchMode::Exhaustive),
            "first-found" | "first_found" | "bfs" | "first" => Ok(SearchMode::FirstFound),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Exhaustive => f.write_str("exhaustive"),
            SearchMode::FirstFound => f.write_str("first-found"),
        }
    }
}

/// Every simple path from `start` that visits `waypoints` in order.
///
/// Missing start or waypoint nodes, and unreachable waypoints, give an
/// empty set. An empty waypoint sequence also gives an empty set.
pub fn search(index: &GraphIndex, start: &str, waypoints: &[NodeId], mode: SearchMode) -> PathSet {
    search_limited(index, start, waypoints, mode, None)
}

/// Bounds on one search run. `None` fields are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Stop once this many distinct complete paths are recorded.
    pub max_paths: Option<usize>,
    /// Stop after this many edge traversals, whether or not they lead anywhere.
    pub max_steps: Option<usize>,
}

impl SearchLimits {
    pub fn paths(max_paths: usize) -> Self {
        Self {
            max_paths: Some(max_paths),
            max_steps: None,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

/// [`search`] with an optional cap on the number of paths collected.
///
/// Exhaustive search is exponential in the number of simple paths; the cap
/// stops it once `max_paths` distinct paths are recorded. `Some(0)` returns
/// nothing. The cap does not bound the work done before that point: branches
/// that never complete are explored in full. Use [`search_bounded`] with a
/// step budget for that.
pub fn search_limited(
    index: &GraphIndex,
    start: &str,
    waypoints: &[NodeId],
    mode: SearchMode,
    max_paths: Option<usize>,
) -> PathSet {
    let limits = SearchLimits {
        max_paths,
        max_steps: None,
    };
    search_bounded(index, start, waypoints, mode, limits)
}

/// [`search`] under a path cap and a step budget.
///
/// A step is one edge pushed onto the current path (exhaustive) or one queue
/// entry created (first-found). When the budget runs out the paths recorded
/// so far are returned, which for exhaustive search is a prefix of the
/// unbounded result; first-found returns nothing unless it completed in time.
pub fn search_bounded(
    index: &GraphIndex,
    start: &str,
    waypoints: &[NodeId],
    mode: SearchMode,
    limits: SearchLimits,
) -> PathSet {
    let limit = limits.max_paths.unwrap_or(usize::MAX);
    let max_steps = limits.max_steps.unwrap_or(usize::MAX);
    if waypoints.is_empty() || limit == 0 {
        return PathSet::new();
    }

    let Some(start_slot) = index.slot(start) else {
        debug!(start, "start node not in graph");
        return PathSet::new();
    };

    let mut targets = Vec::with_capacity(waypoints.len());
    for waypoint in waypoints {
        match index.slot(waypoint) {
            Some(slot) => targets.push(slot),
            None => {
                debug!(start, waypoint = waypoint.as_str(), "waypoint not in graph");
                return PathSet::new();
            }
        }
    }

    let (paths, steps) = match mode {
        SearchMode::Exhaustive => {
            let mut walk = Walk::new(index, &targets, limit, max_steps);
            walk.on_path[start_slot] = true;
            walk.descend(start_slot, 0);
            if walk.out_of_steps {
                debug!(start, max_steps, paths = walk.found.len(), "step budget exhausted");
            }
            let steps = walk.steps;
            (walk.found.into_iter().collect(), steps)
        }
        SearchMode::FirstFound => first_found(index, start_slot, &targets, max_steps),
    };

    debug!(
        start,
        waypoints = waypoints.len(),
        %mode,
        steps,
        paths = paths.len(),
        "waypoint search finished"
    );
    paths
}

/// True if the nodes entered along `path` (every edge target), filtered to
/// members of `waypoints`, reproduce `waypoints` exactly.
pub fn follows_waypoints(path: &Path, waypoints: &[NodeId]) -> bool {
    let members: HashSet<&str> = waypoints.iter().map(String::as_str).collect();
    path.edges()
        .iter()
        .map(|e| e.target.as_str())
        .filter(|node| members.contains(node))
        .eq(waypoints.iter().map(String::as_str))
}

/// Backtracking depth-first state. One shared path stack; nodes are marked on
/// entry and cleared on the way back, so each branch sees only its own path.
struct Walk<'a> {
    index: &'a GraphIndex,
    targets: &'a [Slot],
    is_target: Vec<bool>,
    on_path: Vec<bool>,
    entered: Vec<Slot>,
    edges: Vec<usize>,
    seen: HashSet<Vec<&'a str>>,
    found: Vec<Path>,
    limit: usize,
    steps: usize,
    max_steps: usize,
    out_of_steps: bool,
}

impl<'a> Walk<'a> {
    fn new(index: &'a GraphIndex, targets: &'a [Slot], limit: usize, max_steps: usize) -> Self {
        let mut is_target = vec![false; index.node_count()];
        for &t in targets {
            is_target[t] = true;
        }
        Self {
            index,
            targets,
            is_target,
            on_path: vec![false; index.node_count()],
            entered: Vec::new(),
            edges: Vec::new(),
            seen: HashSet::new(),
            found: Vec::new(),
            limit,
            steps: 0,
            max_steps,
            out_of_steps: false,
        }
    }

    fn stopped(&self) -> bool {
        self.out_of_steps || self.found.len() >= self.limit
    }

    fn descend(&mut self, current: Slot, cursor: usize) {
        if self.stopped() {
            return;
        }
        if cursor == self.targets.len() {
            self.record();
            return;
        }

        let index = self.index;
        for &next in index.neighbor_slots(current) {
            if self.on_path[next] {
                continue;
            }
            let advanced = if next == self.targets[cursor] { cursor + 1 } else { cursor };

            for &edge in index.bucket(current, next) {
                if self.steps >= self.max_steps {
                    self.out_of_steps = true;
                    return;
                }
                self.steps += 1;

                self.on_path[next] = true;
                self.entered.push(next);
                self.edges.push(edge);

                self.descend(next, advanced);

                self.edges.pop();
                self.entered.pop();
                self.on_path[next] = false;

                if self.stopped() {
                    return;
                }
            }
        }
    }

    /// Replay the entered nodes against the waypoint order before keeping a
    /// completed path, independently of the cursor that declared it complete.
    fn record(&mut self) {
        let replay = self
            .entered
            .iter()
            .copied()
            .filter(|&n| self.is_target[n])
            .eq(self.targets.iter().copied());
        if !replay {
            return;
        }

        let index = self.index;
        let key: Vec<&'a str> = self.edges.iter().map(|&e| index.edge(e).id.as_str()).collect();
        if !self.seen.insert(key) {
            return;
        }

        let path = Path::route(self.edges.iter().map(|&e| index.edge(e).clone()).collect());
        trace!(edges = ?path.edge_ids(), "recorded path");
        self.found.push(path);
    }
}

/// A node reached during breadth-first search. Paths are rebuilt from parent
/// pointers instead of cloning the edge list into every queue entry.
struct Step {
    node: Slot,
    edge: usize,
    parent: Option<usize>,
    cursor: usize,
}

/// Returns the path set and the number of steps created.
fn first_found(index: &GraphIndex, start: Slot, targets: &[Slot], max_steps: usize) -> (PathSet, usize) {
    let mut steps: Vec<Step> = Vec::new();
    let mut queue: VecDeque<Option<usize>> = VecDeque::new();
    queue.push_back(None);

    while let Some(at) = queue.pop_front() {
        let (current, cursor) = match at {
            Some(i) => (steps[i].node, steps[i].cursor),
            None => (start, 0),
        };

        for &next in index.neighbor_slots(current) {
            if next == start || on_chain(&steps, at, next) {
                continue;
            }
            let advanced = if next == targets[cursor] { cursor + 1 } else { cursor };

            for &edge in index.bucket(current, next) {
                if steps.len() >= max_steps {
                    debug!(max_steps, "step budget exhausted");
                    return (PathSet::new(), steps.len());
                }
                steps.push(Step {
                    node: next,
                    edge,
                    parent: at,
                    cursor: advanced,
                });
                let id = steps.len() - 1;

                if advanced == targets.len() {
                    let path = Path::route(unwind(index, &steps, id));
                    return (std::iter::once(path).collect(), steps.len());
                }
                queue.push_back(Some(id));
            }
        }
    }

    (PathSet::new(), steps.len())
}

/// True if `node` was already entered on the chain ending at `at`.
fn on_chain(steps: &[Step], mut at: Option<usize>, node: Slot) -> bool {
    while let Some(i) = at {
        if steps[i].node == node {
            return true;
        }
        at = steps[i].parent;
    }
    false
}

fn unwind(index: &GraphIndex, steps: &[Step], last: usize) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut at = Some(last);
    while let Some(i) = at {
        edges.push(index.edge(steps[i].edge).clone());
        at = steps[i].parent;
    }
    edges.reverse();
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<NodeId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// A→B, B→C, A→C, C→D.
    fn make_square() -> GraphIndex {
        GraphIndex::build(vec![
            Edge::new("e1", "A", "B"),
            Edge::new("e2", "B", "C"),
            Edge::new("e3", "A", "C"),
            Edge::new("e4", "C", "D"),
        ])
    }

    fn make_chain(n: usize) -> GraphIndex {
        GraphIndex::build((0..n - 1).map(|i| Edge::new(format!("e{}", i), format!("n{}", i), format!("n{}", i + 1))))
    }

    fn make_cycle(n: usize) -> GraphIndex {
        GraphIndex::build((0..n).map(|i| Edge::new(format!("e{}", i), format!("n{}", i), format!("n{}", (i + 1) % n))))
    }

    // --- Exhaustive ---

    #[test]
    fn test_exhaustive_two_routes() {
        let index = make_square();
        let paths = search(&index, "A", &ids(&["C"]), SearchMode::Exhaustive);
        assert_eq!(paths.edge_id_sequences(), vec![vec!["e1", "e2"], vec!["e3"]]);
    }

    #[test]
    fn test_exhaustive_waypoint_order() {
        let index = make_square();
        let paths = search(&index, "A", &ids(&["B", "D"]), SearchMode::Exhaustive);
        assert_eq!(paths.edge_id_sequences(), vec![vec!["e1", "e2", "e4"]]);
    }

    #[test]
    fn test_exhaustive_reversed_order_unsatisfiable() {
        let index = make_square();
        let paths = search(&index, "A", &ids(&["D", "B"]), SearchMode::Exhaustive);
        assert!(paths.is_empty());
    }

    #[test]
    fn test_exhaustive_stops_at_last_waypoint() {
        let index = make_chain(5);
        let paths = search(&index, "n0", &ids(&["n2"]), SearchMode::Exhaustive);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths.get(0).unwrap().nodes(), vec!["n0", "n1", "n2"]);
    }

    #[test]
    fn test_exhaustive_parallel_edges_are_distinct_paths() {
        let index = GraphIndex::build(vec![
            Edge::new("a1", "A", "B"),
            Edge::new("a2", "A", "B"),
            Edge::new("b1", "B", "C"),
        ]);
        let paths = search(&index, "A", &ids(&["C"]), SearchMode::Exhaustive);
        assert_eq!(paths.edge_id_sequences(), vec![vec!["a1", "b1"], vec!["a2", "b1"]]);
    }

    #[test]
    fn test_exhaustive_duplicate_edge_ids_deduplicated() {
        let index = GraphIndex::build(vec![Edge::new("x", "A", "B"), Edge::new("x", "A", "B")]);
        let paths = search(&index, "A", &ids(&["B"]), SearchMode::Exhaustive);
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_exhaustive_cycle_terminates() {
        let index = make_cycle(6);
        let paths = search(&index, "n0", &ids(&["n4"]), SearchMode::Exhaustive);
        assert_eq!(paths.len(), 1);
        assert!(paths.iter().all(Path::is_simple));
        // The start cannot be re-entered, so the cycle never closes.
        assert!(search(&index, "n0", &ids(&["n0"]), SearchMode::Exhaustive).is_empty());
    }


    #[test]
    fn test_exhaustive_limit() {
        let index = make_square();
        let paths = search_limited(&index, "A", &ids(&["C"]), SearchMode::Exhaustive, Some(1));
        assert_eq!(paths.edge_id_sequences(), vec![vec!["e1", "e2"]]);
        let none = search_limited(&index, "A", &ids(&["C"]), SearchMode::Exhaustive, Some(0));
        assert!(none.is_empty());
    }

    #[test]
    fn test_exhaustive_deterministic() {
        let index = make_square();
        let a = search(&index, "A", &ids(&["C"]), SearchMode::Exhaustive);
        let b = search(&index, "A", &ids(&["C"]), SearchMode::Exhaustive);
        assert_eq!(a, b);
    }

    // --- FirstFound ---

    #[test]
    fn test_first_found_shortest_layer() {
        let index = make_square();
        let paths = search(&index, "A", &ids(&["C"]), SearchMode::FirstFound);
        assert_eq!(paths.edge_id_sequences(), vec![vec!["e3"]]);
    }

    #[test]
    fn test_first_found_waypoint_order() {
        let index = make_square();
        let paths = search(&index, "A", &ids(&["B", "D"]), SearchMode::FirstFound);
        assert_eq!(paths.edge_id_sequences(), vec![vec!["e1", "e2", "e4"]]);
    }

    #[test]
    fn test_first_found_none() {
        let index = make_square();
        let paths = search(&index, "A", &ids(&["D", "B"]), SearchMode::FirstFound);
        assert!(paths.is_empty());
    }

    #[test]
    fn test_first_found_cycle_terminates() {
        let index = make_cycle(5);
        let paths = search(&index, "n0", &ids(&["n3"]), SearchMode::FirstFound);
        assert_eq!(paths.len(), 1);
        assert!(search(&index, "n0", &ids(&["n0"]), SearchMode::FirstFound).is_empty());
    }

    #[test]
    fn test_first_found_parallel_edges_takes_first_bucket_entry() {
        let index = GraphIndex::build(vec![Edge::new("a1", "A", "B"), Edge::new("a2", "A", "B")]);
        let paths = search(&index, "A", &ids(&["B"]), SearchMode::FirstFound);
        assert_eq!(paths.edge_id_sequences(), vec![vec!["a1"]]);
    }

    // --- Empty results ---

    #[test]
    fn test_missing_waypoint() {
        let index = make_square();
        for mode in [SearchMode::Exhaustive, SearchMode::FirstFound] {
            assert!(search(&index, "A", &ids(&["Z"]), mode).is_empty());
        }
    }

    #[test]
    fn test_missing_start() {
        let index = make_square();
        for mode in [SearchMode::Exhaustive, SearchMode::FirstFound] {
            assert!(search(&index, "Z", &ids(&["C"]), mode).is_empty());
        }
    }

    #[test]
    fn test_empty_graph() {
        let index = GraphIndex::build(Vec::new());
        assert!(search(&index, "A", &ids(&["B"]), SearchMode::Exhaustive).is_empty());
    }

    #[test]
    fn test_empty_waypoints() {
        let index = make_square();
        assert!(search(&index, "A", &[], SearchMode::Exhaustive).is_empty());
        assert!(search(&index, "A", &[], SearchMode::FirstFound).is_empty());
    }

    #[test]
    fn test_duplicate_waypoints_unsatisfiable() {
        let index = make_square();
        for mode in [SearchMode::Exhaustive, SearchMode::FirstFound] {
            assert!(search(&index, "A", &ids(&["C", "C"]), mode).is_empty(), "{}", mode);
        }
    }

    #[test]
    fn test_start_as_waypoint_unsatisfiable() {
        // The start is already on the path and cannot be entered again.
        let index = make_square();
        for mode in [SearchMode::Exhaustive, SearchMode::FirstFound] {
            assert!(search(&index, "A", &ids(&["A", "C"]), mode).is_empty(), "{}", mode);
        }
    }

    #[test]
    fn test_self_loop_ignored() {
        let index = GraphIndex::build(vec![Edge::new("s", "A", "A"), Edge::new("e", "A", "B")]);
        let paths = search(&index, "A", &ids(&["B"]), SearchMode::Exhaustive);
        assert_eq!(paths.edge_id_sequences(), vec![vec!["e"]]);
    }

    // --- Step budget ---

    /// Every ordered pair of `k0..k{n-1}` connected, plus `island -> k0`.
    fn make_dense_with_island(n: usize) -> GraphIndex {
        let mut edges = Vec::new();
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    edges.push(Edge::new(format!("k{}-{}", i, j), format!("k{}", i), format!("k{}", j)));
                }
            }
        }
        edges.push(Edge::new("bridge", "island", "k0"));
        GraphIndex::build(edges)
    }

    #[test]
    fn test_step_budget_exact() {
        let index = make_chain(5);
        for mode in [SearchMode::Exhaustive, SearchMode::FirstFound] {
            let enough = SearchLimits::default().with_max_steps(4);
            let paths = search_bounded(&index, "n0", &ids(&["n4"]), mode, enough);
            assert_eq!(paths.edge_id_sequences(), vec![vec!["e0", "e1", "e2", "e3"]], "{}", mode);

            let short = SearchLimits::default().with_max_steps(3);
            assert!(search_bounded(&index, "n0", &ids(&["n4"]), mode, short).is_empty(), "{}", mode);
        }
    }

    #[test]
    fn test_step_budget_bounds_dead_branches() {
        // Unbounded, both modes would walk every simple path of a complete
        // 12-node graph before concluding the island is unreachable.
        let index = make_dense_with_island(12);
        let limits = SearchLimits::paths(1).with_max_steps(10_000);
        for mode in [SearchMode::Exhaustive, SearchMode::FirstFound] {
            assert!(search_bounded(&index, "k0", &ids(&["island"]), mode, limits).is_empty(), "{}", mode);
        }
    }

    #[test]
    fn test_step_budget_keeps_prefix() {
        let index = make_square();
        let limits = SearchLimits::default().with_max_steps(2);
        let paths = search_bounded(&index, "A", &ids(&["C"]), SearchMode::Exhaustive, limits);
        assert_eq!(paths.edge_id_sequences(), vec![vec!["e1", "e2"]]);
    }

    #[test]
    fn test_limited_matches_bounded_without_steps() {
        let index = make_square();
        let limited = search_limited(&index, "A", &ids(&["C"]), SearchMode::Exhaustive, Some(5));
        let bounded = search_bounded(&index, "A", &ids(&["C"]), SearchMode::Exhaustive, SearchLimits::paths(5));
        assert_eq!(limited, bounded);
    }

    // --- Helpers ---

    #[test]
    fn test_follows_waypoints() {
        let p = Path::route(vec![
            Edge::new("e1", "A", "B"),
            Edge::new("e2", "B", "X"),
            Edge::new("e3", "X", "D"),
        ]);
        assert!(follows_waypoints(&p, &ids(&["B", "D"])));
        assert!(!follows_waypoints(&p, &ids(&["D", "B"])));
        assert!(!follows_waypoints(&p, &ids(&["B", "B"])));
        assert!(!follows_waypoints(&p, &ids(&["C"])));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("dfs".parse::<SearchMode>(), Ok(SearchMode::Exhaustive));
        assert_eq!("BFS".parse::<SearchMode>(), Ok(SearchMode::FirstFound));
        assert_eq!("first-found".parse::<SearchMode>(), Ok(SearchMode::FirstFound));
        assert!("sideways".parse::<SearchMode>().is_err());
        assert_eq!(SearchMode::FirstFound.to_string(), "first-found");
    }

    #[test]
    fn test_mode_deserialize_aliases() {
        let m: SearchMode = serde_json::from_str("\"bfs\"").unwrap();
        assert_eq!(m, SearchMode::FirstFound);
        let m: SearchMode = serde_json::from_str("\"exhaustive\"").unwrap();
        assert_eq!(m, SearchMode::Exhaustive);
    }
}
