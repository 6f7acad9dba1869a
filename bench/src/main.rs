use std::time::Instant;

use strategy_paths_core::{
    extract_limited, search_bounded, Edge, Graph, GraphIndex, NodeId, NodeInfo, SearchLimits, SearchMode,
};

/// Exhaustive search is exponential in the number of simple paths; every
/// exhaustive run stops after this many.
const PATH_CAP: usize = 10_000;

/// The path cap only counts completed paths, so dead branches are bounded
/// separately by the number of edge traversals.
const STEP_BUDGET: usize = 2_000_000;

/// A generated topology and the query to time on it.
struct Workload {
    graph: Graph,
    start: NodeId,
    waypoints: Vec<NodeId>,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let node_count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(2_000);

    if mode == "help" || mode == "--help" {
        println!("Usage: strategy-paths-bench [mode] [node_count]");
        println!();
        println!("Modes:");
        println!("  all         Run all generators and benchmark each (default)");
        println!("  tree        Layered fan-out tree with sparse lateral edges");
        println!("  ring        Ring lattice with random shortcuts");
        println!("  random      Uniform random edges, some parallel");
        println!("  barbell     Two dense clusters joined by a thin bridge");
        println!();
        println!(
            "Default node_count: 2000. Runs stop at {} paths or {} steps.",
            PATH_CAP, STEP_BUDGET
        );
        return;
    }
    if node_count < 16 {
        eprintln!("node_count must be at least 16");
        return;
    }

    println!("strategy-paths-bench");
    println!("====================");
    println!();

    let generators: Vec<(&str, fn(u64) -> Workload)> = match mode {
        "tree" => vec![("Layered fan-out tree", gen_tree)],
        "ring" => vec![("Ring lattice + shortcuts", gen_ring)],
        "random" => vec![("Uniform random", gen_random)],
        "barbell" => vec![("Barbell (cluster-bridge-cluster)", gen_barbell)],
        "all" => vec![
            ("Layered fan-out tree", gen_tree as fn(u64) -> Workload),
            ("Ring lattice + shortcuts", gen_ring),
            ("Uniform random", gen_random),
            ("Barbell (cluster-bridge-cluster)", gen_barbell),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, node_count);
    }
}

fn ms(t: Instant) -> f64 {
    t.elapsed().as_secs_f64() * 1000.0
}

fn run_benchmark(name: &str, generator: fn(u64) -> Workload, node_count: u64) {
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let work = generator(node_count);
    println!(
        "Generated in {:.1}ms: {} nodes, {} edges",
        ms(t),
        work.graph.node_count(),
        work.graph.edge_count()
    );

    let t = Instant::now();
    let index: GraphIndex = work.graph.index();
    println!(
        "Index built in {:.1}ms: {} pairs, ~{:.1}MB",
        ms(t),
        index.pair_count(),
        index.memory_usage() as f64 / 1_048_576.0
    );
    println!("Query: {} via {}", work.start, work.waypoints.join(" > "));

    let limits = SearchLimits::paths(PATH_CAP).with_max_steps(STEP_BUDGET);

    println!();
    println!("{:>14} {:>10} {:>12} {:>10}", "operation", "paths", "max length", "time");
    println!("{:->14} {:->10} {:->12} {:->10}", "", "", "", "");

    for (label, mode) in [("exhaustive", SearchMode::Exhaustive), ("first-found", SearchMode::FirstFound)] {
        let t = Instant::now();
        let paths = search_bounded(&index, &work.start, &work.waypoints, mode, limits);
        let elapsed = ms(t);
        let longest = paths.iter().map(|p| p.len()).max().unwrap_or(0);
        println!("{:>14} {:>10} {:>12} {:>8.1}ms", label, paths.len(), longest, elapsed);
    }

    let t = Instant::now();
    let sub = extract_limited(&index, &work.start, &work.waypoints, work.graph.edges(), limits);
    let elapsed = ms(t);
    let longest = sub.paths.iter().map(|p| p.len()).max().unwrap_or(0);
    println!("{:>14} {:>10} {:>12} {:>8.1}ms", "extract", sub.paths.len(), longest, elapsed);
    println!("{:>14} {} nodes touched", "", sub.touched_nodes.len());
    println!();
}

// ---------------------------------------------------------------------------
// Generators: deterministic, single-threaded, O(nodes + edges)
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
}

fn node(i: u64) -> NodeId {
    format!("n{}", i)
}

/// Builds edges with sequential `e<n>` ids.
struct Builder {
    graph: Graph,
}

impl Builder {
    fn new(node_count: u64, edge_count: u64, kind: &str) -> Self {
        let mut graph = Graph::with_capacity(node_count as usize, edge_count as usize);
        for i in 0..node_count {
            let info = NodeInfo {
                label: node(i),
                kind: Some(kind.to_string()),
                is_end: false,
            };
            graph.add_node(node(i), info);
        }
        Self { graph }
    }

    fn edge(&mut self, from: u64, to: u64) {
        let id = format!("e{}", self.graph.edge_count() + 1);
        self.graph.add_edge(Edge::new(id, node(from), node(to)));
    }

    fn finish(self, start: u64, waypoints: &[u64]) -> Workload {
        Workload {
            graph: self.graph,
            start: node(start),
            waypoints: waypoints.iter().map(|&w| node(w)).collect(),
        }
    }
}

/// Layered fan-out tree: every node spawns three children in the next layer.
///
/// One in ten children also gets an edge from a random node of its parent's
/// layer, so deep waypoints are reachable along several routes. The query
/// runs from the root through the last node's parent to the last node.
fn gen_tree(node_count: u64) -> Workload {
    let mut b = Builder::new(node_count, node_count + node_count / 10, "tree");
    let mut rng = FastRng::new(42);

    let mut parent = vec![0u64; node_count as usize];
    let mut next_id: u64 = 1;
    let mut frontier: Vec<u64> = vec![0];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * 3);
        for &p in &frontier {
            for _ in 0..3 {
                if next_id >= node_count {
                    break;
                }
                let child = next_id;
                next_id += 1;
                parent[child as usize] = p;
                b.edge(p, child);
                if rng.next(10) == 0 {
                    let lateral = frontier[rng.next(frontier.len() as u64) as usize];
                    if lateral != p {
                        b.edge(lateral, child);
                    }
                }
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    let last = node_count - 1;
    b.finish(0, &[parent[last as usize], last])
}

/// Ring lattice: each node points to its next four neighbors clockwise, with
/// one in twenty edges rewired to a random node. Query goes half way round,
/// then to the node just before the start.
fn gen_ring(node_count: u64) -> Workload {
    let k = 4u64;
    let mut b = Builder::new(node_count, node_count * k, "ring");
    let mut rng = FastRng::new(67890);

    for i in 0..node_count {
        for j in 1..=k {
            let neighbor = (i + j) % node_count;
            if rng.next(20) == 0 {
                let rewired = rng.next(node_count);
                b.edge(i, if rewired != i { rewired } else { neighbor });
            } else {
                b.edge(i, neighbor);
            }
        }
    }

    b.finish(0, &[node_count / 2, node_count - 1])
}

/// Uniform random edges, about four per node. Repeated pairs become
/// parallel edges.
fn gen_random(node_count: u64) -> Workload {
    let target_edges = node_count * 4;
    let mut b = Builder::new(node_count, target_edges, "random");
    let mut rng = FastRng::new(54321);

    for _ in 0..target_edges {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        if from != to {
            b.edge(from, to);
        }
    }

    b.finish(0, &[node_count / 3, 2 * node_count / 3])
}

/// Barbell: two dense clusters joined by a chain of bridge nodes.
///
/// Every route from the first cluster to the second crosses the bridge, so
/// the query start sits in cluster A and both waypoints in cluster B.
fn gen_barbell(node_count: u64) -> Workload {
    let bridge_len = 10u64.min(node_count / 4);
    let cluster = (node_count - bridge_len) / 2;
    let degree = 6u64.min(cluster - 1);
    let mut b = Builder::new(cluster * 2 + bridge_len, cluster * degree * 2 + bridge_len + 1, "barbell");
    let mut rng = FastRng::new(99999);

    let b_start = cluster + bridge_len;
    for base in [0, b_start] {
        for i in 0..cluster {
            for _ in 0..degree {
                let target = rng.next(cluster);
                if target != i {
                    b.edge(base + i, base + target);
                }
            }
        }
    }

    // Chain from the last node of A through the bridge into the first node of B.
    for i in 0..=bridge_len {
        b.edge(cluster - 1 + i, cluster + i);
    }

    b.finish(0, &[b_start, b_start + cluster - 1])
}
