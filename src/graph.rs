//! Graph model: labelled nodes interned into dense indices over an immutable topology.

use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;

use fixedbitset::FixedBitSet;
use indexmap::IndexSet;
use itertools::Itertools;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use crate::config::DanglingEdgePolicy;
use crate::cycles;
use crate::error::{MisError, Result};

/// Opaque node identifier as it appears in JSON: an integer or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(i) => write!(f, "{i}"),
            NodeId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NodeId {
    fn from(i: i64) -> Self {
        NodeId::Int(i)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::Text(s.to_string())
    }
}

/// Node list plus edge list, the shape callers hand in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRequest<N> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<N>,
    #[serde(default = "Vec::new")]
    pub edges: Vec<(N, N)>,
}

impl<N> GraphRequest<N> {
    pub fn new(nodes: Vec<N>, edges: Vec<(N, N)>) -> Self {
        Self { nodes, edges }
    }
}

/// =============== Topology ===============

/// Undirected simple graph on nodes `0..n`, stored as sorted adjacency lists.
///
/// Validation and solving only ever look at a `Topology`; node labels stay in
/// [`Graph`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl Topology {
    /// Builds a topology on `n` nodes. Endpoints must be distinct and `< n`;
    /// repeated edges collapse.
    pub fn from_edges(n: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut adjacency = vec![Vec::new(); n];
        for (u, v) in edges {
            debug_assert_ne!(u, v, "self-loop on {u}");
            adjacency[u].push(v);
            adjacency[v].push(u);
        }
        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup();
        }
        let edge_count = adjacency.iter().map(Vec::len).sum::<usize>() / 2;
        Self {
            adjacency,
            edge_count,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn neighbors(&self, u: usize) -> &[usize] {
        &self.adjacency[u]
    }

    pub fn degree(&self, u: usize) -> usize {
        self.adjacency[u].len()
    }

    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adjacency[u].binary_search(&v).is_ok()
    }

    /// Every edge once, as `(u, v)` with `u < v`, in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(u, list)| list.iter().filter(move |&&v| u < v).map(move |&v| (u, v)))
    }

    /// Mask with every node set.
    pub fn all_nodes(&self) -> FixedBitSet {
        let mut mask = FixedBitSet::with_capacity(self.node_count());
        mask.insert_range(..);
        mask
    }

    /// Number of edges with both endpoints in `subset`.
    pub fn induced_edge_count(&self, subset: &[usize]) -> usize {
        subset
            .iter()
            .tuple_combinations()
            .filter(|&(&u, &v)| self.has_edge(u, v))
            .count()
    }

    /// Induced subgraph on `subset`; node `i` of the result is `subset[i]`.
    pub fn induced_subgraph(&self, subset: &[usize]) -> UnGraph<(), ()> {
        let mut g = UnGraph::<(), ()>::with_capacity(subset.len(), 0);
        let nodes: Vec<NodeIndex> = subset.iter().map(|_| g.add_node(())).collect();
        for (i, j) in (0..subset.len()).tuple_combinations() {
            if self.has_edge(subset[i], subset[j]) {
                g.add_edge(nodes[i], nodes[j], ());
            }
        }
        g
    }

    pub fn to_petgraph(&self) -> UnGraph<(), ()> {
        let mut g = UnGraph::<(), ()>::with_capacity(self.node_count(), self.edge_count);
        for _ in 0..self.node_count() {
            g.add_node(());
        }
        for (u, v) in self.edges() {
            g.add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
        }
        g
    }

    /// Copy of this topology with one extra node adjacent to every other node.
    pub fn with_apex(&self) -> Topology {
        let apex = self.node_count();
        Topology::from_edges(
            apex + 1,
            self.edges().chain((0..apex).map(|u| (u, apex))),
        )
    }

    /// `true` iff `members` holds no repeated node and no two adjacent nodes.
    pub fn is_independent(&self, members: &[usize]) -> bool {
        let mut seen = FixedBitSet::with_capacity(self.node_count());
        for &u in members {
            if u >= self.node_count() || seen.contains(u) {
                return false;
            }
            seen.insert(u);
        }
        members
            .iter()
            .all(|&u| self.adjacency[u].iter().all(|&v| !seen.contains(v)))
    }
}

/// =============== Labelled graph ===============

/// A request's graph: node identifiers interned in input order over a [`Topology`].
#[derive(Debug, Clone)]
pub struct Graph<N> {
    labels: IndexSet<N>,
    topology: Topology,
}

impl<N: Clone + Eq + Hash + Debug> Graph<N> {
    /// Builds the graph. Duplicate nodes and parallel edges collapse; self-loops
    /// are rejected; unknown edge endpoints follow `policy`.
    pub fn new(
        nodes: impl IntoIterator<Item = N>,
        edges: impl IntoIterator<Item = (N, N)>,
        policy: DanglingEdgePolicy,
    ) -> Result<Self> {
        let mut labels: IndexSet<N> = nodes.into_iter().collect();
        let mut pairs = Vec::new();
        for (a, b) in edges {
            if a == b {
                return Err(MisError::InvalidGraph(format!("self-loop on node {a:?}")));
            }
            let u = resolve(&mut labels, &a, policy, (&a, &b))?;
            let v = resolve(&mut labels, &b, policy, (&a, &b))?;
            pairs.push((u, v));
        }
        let topology = Topology::from_edges(labels.len(), pairs);
        Ok(Self { labels, topology })
    }

    pub fn from_request(request: &GraphRequest<N>, policy: DanglingEdgePolicy) -> Result<Self> {
        Self::new(
            request.nodes.iter().cloned(),
            request.edges.iter().cloned(),
            policy,
        )
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn node_count(&self) -> usize {
        self.topology.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }

    pub fn label(&self, index: usize) -> Option<&N> {
        self.labels.get_index(index)
    }

    pub fn index_of(&self, node: &N) -> Option<usize> {
        self.labels.get_index_of(node)
    }

    /// Maps dense indices back to identifiers, skipping unknown indices.
    pub fn labels_of(&self, indices: &[usize]) -> Vec<N> {
        indices
            .iter()
            .filter_map(|&i| self.labels.get_index(i).cloned())
            .collect()
    }

    /// `true` iff every member is a node of the graph, none repeats, and no
    /// two are adjacent.
    pub fn is_independent(&self, members: &[N]) -> bool {
        let indices: Option<Vec<usize>> = members.iter().map(|m| self.index_of(m)).collect();
        match indices {
            Some(indices) => self.topology.is_independent(&indices),
            None => false,
        }
    }

    /// Fundamental cycles of the whole graph, each as a node sequence.
    pub fn cycle_basis(&self) -> Vec<Vec<N>> {
        cycles::cycle_basis(&self.topology, &self.topology.all_nodes())
            .iter()
            .map(|cycle| self.labels_of(cycle))
            .collect()
    }
}

fn resolve<N: Clone + Eq + Hash + Debug>(
    labels: &mut IndexSet<N>,
    node: &N,
    policy: DanglingEdgePolicy,
    edge: (&N, &N),
) -> Result<usize> {
    if let Some(i) = labels.get_index_of(node) {
        return Ok(i);
    }
    match policy {
        DanglingEdgePolicy::Register => Ok(labels.insert_full(node.clone()).0),
        DanglingEdgePolicy::Reject => Err(MisError::InvalidGraph(format!(
            "edge ({:?}, {:?}) references unknown node {:?}",
            edge.0, edge.1, node
        ))),
    }
}
