use std::collections::HashSet;

use serde::Serialize;

use crate::graph::Edge;

/// What a [`PathSet`] entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    /// A simple path produced by waypoint search.
    Route,
    /// Every edge interconnecting a required-node set. May branch or cycle.
    Induced,
    /// The parallel edges of one configured hop, used verbatim.
    Direct,
}

/// An ordered sequence of edges. Only [`PathKind::Route`] entries are
/// guaranteed to be contiguous simple walks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    kind: PathKind,
    edges: Vec<Edge>,
}

impl Path {
    pub fn route(edges: Vec<Edge>) -> Self {
        Self {
            kind: PathKind::Route,
            edges,
        }
    }

    pub fn induced(edges: Vec<Edge>) -> Self {
        Self {
            kind: PathKind::Induced,
            edges,
        }
    }

    pub fn direct(edges: Vec<Edge>) -> Self {
        Self {
            kind: PathKind::Direct,
            edges,
        }
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge_ids(&self) -> Vec<&str> {
        self.edges.iter().map(|e| e.id.as_str()).collect()
    }

    /// Node ids in walk order: the first edge's source, then every edge's target.
    pub fn nodes(&self) -> Vec<&str> {
        let mut nodes = Vec::with_capacity(self.edges.len() + 1);
        if let Some(first) = self.edges.first() {
            nodes.push(first.source.as_str());
        }
        nodes.extend(self.edges.iter().map(|e| e.target.as_str()));
        nodes
    }

    /// Distinct endpoint ids in first-seen order. Meaningful for every kind.
    pub fn touched_nodes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .flat_map(|e| [e.source.as_str(), e.target.as_str()])
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Contiguous walk with no repeated node.
    pub fn is_simple(&self) -> bool {
        let contiguous = self.edges.windows(2).all(|w| w[0].target == w[1].source);
        let nodes = self.nodes();
        let distinct: HashSet<&str> = nodes.iter().copied().collect();
        contiguous && distinct.len() == nodes.len()
    }
}

/// Ordered collection of paths returned by every search entry point.
///
/// Uniqueness is established by the producer: waypoint search never emits
/// two routes with the same edge-id sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathSet {
    paths: Vec<Path>,
}

impl PathSet {
    pub fn new() -> Self {
        Self { paths: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn push(&mut self, path: Path) {
        self.paths.push(path);
    }

    pub fn extend(&mut self, other: PathSet) {
        self.paths.extend(other.paths);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }

    pub fn get(&self, i: usize) -> Option<&Path> {
        self.paths.get(i)
    }

    /// Each entry as its edge-id sequence; the shape the rendering layer consumes.
    pub fn edge_id_sequences(&self) -> Vec<Vec<&str>> {
        self.paths.iter().map(Path::edge_ids).collect()
    }

    /// Distinct edge ids across all entries, in first-seen order.
    pub fn highlighted_edges(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.paths
            .iter()
            .flat_map(|p| p.edges.iter().map(|e| e.id.as_str()))
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn into_vec(self) -> Vec<Path> {
        self.paths
    }
}

impl FromIterator<Path> for PathSet {
    fn from_iter<T: IntoIterator<Item = Path>>(iter: T) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PathSet {
    type Item = Path;
    type IntoIter = std::vec::IntoIter<Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a Path;
    type IntoIter = std::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
