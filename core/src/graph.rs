use std::collections::HashMap;

use serde::Serialize;

/// Stable node identifier taken from the topology descriptor.
pub type NodeId = String;

/// Stable edge identifier. Parallel edges between the same pair carry distinct ids.
pub type EdgeId = String;

/// Dense index assigned to a node when a [`GraphIndex`] is built.
pub(crate) type Slot = usize;

/// Display metadata about a node. Searches never look at it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeInfo {
    pub label: String,
    pub kind: Option<String>,
    pub is_end: bool,
}

/// A directed edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Topology snapshot: declared nodes plus the ordered edge list.
///
/// Built once from configuration and treated as read-only afterwards.
/// Any id appearing as an edge endpoint is a node even when it was never
/// declared; such nodes get an empty [`NodeInfo`].
#[derive(Debug)]
pub struct Graph {
    nodes: HashMap<NodeId, NodeInfo>,
    node_order: Vec<NodeId>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            node_order: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Pre-allocate for a known topology size.
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            nodes: HashMap::with_capacity(node_count),
            node_order: Vec::with_capacity(node_count),
            edges: Vec::with_capacity(edge_count),
        }
    }

    /// Register a node with metadata. Re-registering replaces the metadata
    /// but keeps the original declaration position.
    pub fn add_node(&mut self, id: impl Into<NodeId>, info: NodeInfo) {
        let id = id.into();
        if !self.nodes.contains_key(&id) {
            self.node_order.push(id.clone());
        }
        self.nodes.insert(id, info);
    }

    /// Append a directed edge, registering undeclared endpoints.
    pub fn add_edge(&mut self, edge: Edge) {
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                self.node_order.push(endpoint.clone());
                self.nodes.insert(endpoint.clone(), NodeInfo::default());
            }
        }
        self.edges.push(edge);
    }

    pub fn node(&self, id: &str) -> Option<&NodeInfo> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in declaration order (implicit nodes at the point their first edge was added).
    pub fn nodes_iter(&self) -> impl Iterator<Item = (&str, &NodeInfo)> {
        self.node_order
            .iter()
            .filter_map(|id| self.nodes.get(id).map(|info| (id.as_str(), info)))
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Build the adjacency index for this snapshot.
    pub fn index(&self) -> GraphIndex {
        GraphIndex::build(self.edges.iter().cloned())
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

/// Adjacency index derived from an edge list.
///
/// Node ids are interned to dense slots. `adjacency[s]` lists the distinct
/// outgoing neighbors of `s` in order of first appearance; `buckets` maps a
/// `(source, target)` slot pair to the positions of every edge realizing it,
/// in input order. Both orders are stable, so equal inputs traverse identically.
#[derive(Debug)]
pub struct GraphIndex {
    edges: Vec<Edge>,
    slots: HashMap<NodeId, Slot>,
    names: Vec<NodeId>,
    adjacency: Vec<Vec<Slot>>,
    buckets: HashMap<(Slot, Slot), Vec<usize>>,
}

impl GraphIndex {
    /// Index an edge sequence. Never fails; no edges means an empty index.
    pub fn build<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut index = Self {
            edges: Vec::new(),
            slots: HashMap::new(),
            names: Vec::new(),
            adjacency: Vec::new(),
            buckets: HashMap::new(),
        };

        for edge in edges {
            let source = index.intern(&edge.source);
            let target = index.intern(&edge.target);

            let bucket = index.buckets.entry((source, target)).or_default();
            if bucket.is_empty() {
                index.adjacency[source].push(target);
            }
            bucket.push(index.edges.len());
            index.edges.push(edge);
        }

        index
    }

    fn intern(&mut self, id: &str) -> Slot {
        if let Some(&slot) = self.slots.get(id) {
            return slot;
        }
        let slot = self.names.len();
        self.names.push(id.to_string());
        self.slots.insert(id.to_string(), slot);
        self.adjacency.push(Vec::new());
        slot
    }

    /// True if `id` appears as an endpoint of any indexed edge.
    pub fn contains_node(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    /// Distinct outgoing neighbors of `id`, in first-seen order.
    pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        let slots: &[Slot] = match self.slot(id) {
            Some(slot) => &self.adjacency[slot],
            None => &[],
        };
        slots.iter().map(move |&s| self.names[s].as_str())
    }

    /// Every edge from `source` to `target`, in input order.
    pub fn edges_between<'a>(&'a self, source: &str, target: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        let positions: &[usize] = match (self.slot(source), self.slot(target)) {
            (Some(s), Some(t)) => self.bucket(s, t),
            _ => &[],
        };
        positions.iter().map(move |&i| &self.edges[i])
    }

    pub fn has_direct_edge(&self, source: &str, target: &str) -> bool {
        self.edges_between(source, target).next().is_some()
    }

    /// The indexed edges, in input order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of distinct `(source, target)` pairs.
    pub fn pair_count(&self) -> usize {
        self.buckets.len()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let edge_mem: usize = self
            .edges
            .iter()
            .map(|e| size_of::<Edge>() + e.id.len() + e.source.len() + e.target.len())
            .sum();
        let name_mem: usize = self.names.iter().map(|n| 2 * (n.len() + size_of::<NodeId>()) + 16).sum();
        let adjacency_mem: usize = self.adjacency.iter().map(|v| v.len() * size_of::<Slot>() + 24).sum();
        let bucket_mem = self.buckets.len() * (2 * size_of::<Slot>() + 40) + self.edges.len() * size_of::<usize>();

        edge_mem + name_mem + adjacency_mem + bucket_mem
    }

    pub(crate) fn slot(&self, id: &str) -> Option<Slot> {
        self.slots.get(id).copied()
    }

    pub(crate) fn neighbor_slots(&self, slot: Slot) -> &[Slot] {
        &self.adjacency[slot]
    }

    pub(crate) fn bucket(&self, source: Slot, target: Slot) -> &[usize] {
        self.buckets
            .get(&(source, target))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn edge(&self, position: usize) -> &Edge {
        &self.edges[position]
    }
}
