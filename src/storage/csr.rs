//! CSR (Compressed Sparse Row) graph representation
//!
//! # CSR Format
//!
//! ```text
//! Graph: 0 - 1, 0 - 2, 1 - 2   (undirected, each edge stored as two arcs)
//!
//! CSR:
//!   ai: [0, 2, 4, 6]          // Node 0: arcs [0..2), Node 1: [2..4), Node 2: [4..6)
//!   aj: [1, 2, 0, 2, 0, 1]    // Arc targets
//!   a:  None                  // Unit weights
//! ```
//!
//! The graph is immutable once built. Conductance is only meaningful on
//! symmetric graphs (every arc `u → v` matched by `v → u` with equal weight);
//! [`CsrGraph::is_symmetric`] checks this but construction does not require it.

use super::index::GraphIndex;
use crate::error::{ClusterError, Result};
use std::collections::HashMap;
use std::fmt;

/// Node identifier (zero-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// CSR (Compressed Sparse Row) graph
///
/// `V` is the vertex id type stored in the column array, `E` the arc offset
/// type stored in the row array. Degrees (sum of arc weights) and the total
/// volume are computed once at construction.
///
/// # Example
///
/// ```
/// use seedclust::{CsrGraph, NodeId};
///
/// let graph: CsrGraph = CsrGraph::from_undirected_edges(&[
///     (NodeId(0), NodeId(1), 1.0),
///     (NodeId(0), NodeId(2), 1.0),
/// ]).unwrap();
///
/// assert_eq!(graph.num_nodes(), 3);
/// assert_eq!(graph.num_arcs(), 4);
/// assert_eq!(graph.degree(NodeId(0)).unwrap(), 2.0);
/// assert!(graph.is_symmetric());
/// ```
#[derive(Debug, Clone)]
pub struct CsrGraph<V: GraphIndex = u32, E: GraphIndex = V> {
    /// Row offsets, length `num_nodes + 1`
    row_offsets: Vec<E>,

    /// Arc targets, length `num_arcs`
    col_indices: Vec<V>,

    /// Arc weights, length `num_arcs`; `None` means unit weights
    edge_weights: Option<Vec<f64>>,

    /// Weighted degree per node
    degrees: Vec<f64>,

    /// Sum of all degrees
    total_volume: f64,

    num_nodes: usize,
}

impl<V: GraphIndex, E: GraphIndex> CsrGraph<V, E> {
    /// Wrap caller-built CSR arrays
    ///
    /// # Arguments
    ///
    /// * `num_nodes` - Vertex count `n`
    /// * `row_offsets` - `ai`, length `n + 1`, non-decreasing, `ai[0] = 0`
    /// * `col_indices` - `aj`, length `ai[n]`, values in `[0, n)`
    /// * `edge_weights` - optional `a`, same length as `aj`, finite and non-negative
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::LengthMismatch`] or [`ClusterError::InvalidCsr`]
    /// naming the first violated invariant.
    pub fn from_csr(
        num_nodes: usize,
        row_offsets: Vec<E>,
        col_indices: Vec<V>,
        edge_weights: Option<Vec<f64>>,
    ) -> Result<Self> {
        let expected_offsets = num_nodes
            .checked_add(1)
            .ok_or_else(|| ClusterError::invalid_csr("node count overflows usize"))?;
        if row_offsets.len() != expected_offsets {
            return Err(ClusterError::LengthMismatch {
                what: "row offsets",
                expected: expected_offsets,
                actual: row_offsets.len(),
            });
        }
        if row_offsets[0].index() != 0 {
            return Err(ClusterError::invalid_csr("first row offset must be 0"));
        }
        if let Some(v) = row_offsets.windows(2).position(|w| w[0] > w[1]) {
            return Err(ClusterError::invalid_csr(format!(
                "row offsets decrease at node {v}"
            )));
        }
        let num_arcs = row_offsets[num_nodes].index();
        if num_arcs != col_indices.len() {
            return Err(ClusterError::invalid_csr(format!(
                "last row offset is {num_arcs} but there are {} column indices",
                col_indices.len()
            )));
        }
        if let Some(arc) = col_indices.iter().position(|t| t.index() >= num_nodes) {
            return Err(ClusterError::invalid_csr(format!(
                "arc {arc} targets node {} outside [0, {num_nodes})",
                col_indices[arc].index()
            )));
        }
        if let Some(weights) = &edge_weights {
            if weights.len() != num_arcs {
                return Err(ClusterError::LengthMismatch {
                    what: "edge weights",
                    expected: num_arcs,
                    actual: weights.len(),
                });
            }
            if let Some(arc) = weights.iter().position(|w| !w.is_finite() || *w < 0.0) {
                return Err(ClusterError::invalid_csr(format!(
                    "arc {arc} has invalid weight {}",
                    weights[arc]
                )));
            }
        }

        let degrees: Vec<f64> = (0..num_nodes)
            .map(|v| {
                let start = row_offsets[v].index();
                let end = row_offsets[v + 1].index();
                match &edge_weights {
                    Some(weights) => weights[start..end].iter().sum(),
                    #[allow(clippy::cast_precision_loss)] // degrees > 2^53 unlikely
                    None => (end - start) as f64,
                }
            })
            .collect();
        let total_volume = degrees.iter().sum();

        Ok(Self {
            row_offsets,
            col_indices,
            edge_weights,
            degrees,
            total_volume,
            num_nodes,
        })
    }

    /// Create graph from a directed arc list
    ///
    /// Node count is `max id + 1`. Arcs keep their input order within each row.
    ///
    /// # Errors
    ///
    /// Returns error if a weight is invalid or a count overflows `V`/`E`
    pub fn from_edge_list(edges: &[(NodeId, NodeId, f64)]) -> Result<Self> {
        let num_nodes = node_count::<V>(edges.iter().map(|(src, dst, _)| src.0.max(dst.0)))?;

        let mut adj_list: Vec<Vec<(usize, f64)>> = vec![Vec::new(); num_nodes];
        for (src, dst, weight) in edges {
            adj_list[src.0].push((dst.0, *weight));
        }

        Self::from_adjacency(num_nodes, &adj_list)
    }

    /// Create a symmetric graph from an undirected edge list
    ///
    /// Each edge `{u, v}` becomes arcs `u → v` and `v → u`; a self loop
    /// becomes a single arc.
    ///
    /// # Errors
    ///
    /// Returns error if a weight is invalid or a count overflows `V`/`E`
    pub fn from_undirected_edges(edges: &[(NodeId, NodeId, f64)]) -> Result<Self> {
        let num_nodes = node_count::<V>(edges.iter().map(|(u, v, _)| u.0.max(v.0)))?;

        let mut adj_list: Vec<Vec<(usize, f64)>> = vec![Vec::new(); num_nodes];
        for (u, v, weight) in edges {
            adj_list[u.0].push((v.0, *weight));
            if u != v {
                adj_list[v.0].push((u.0, *weight));
            }
        }

        Self::from_adjacency(num_nodes, &adj_list)
    }

    fn from_adjacency(num_nodes: usize, adj_list: &[Vec<(usize, f64)>]) -> Result<Self> {
        let num_arcs: usize = adj_list.iter().map(Vec::len).sum();

        let mut row_offsets = Vec::with_capacity(num_nodes + 1);
        let mut col_indices = Vec::with_capacity(num_arcs);
        let mut edge_weights = Vec::with_capacity(num_arcs);

        row_offsets.push(to_index::<E>(0)?);
        for neighbors in adj_list {
            for &(target, weight) in neighbors {
                col_indices.push(to_index::<V>(target)?);
                edge_weights.push(weight);
            }
            row_offsets.push(to_index::<E>(col_indices.len())?);
        }

        Self::from_csr(num_nodes, row_offsets, col_indices, Some(edge_weights))
    }

    /// Get number of nodes
    #[must_use]
    pub const fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Get number of stored arcs (an undirected edge counts twice)
    #[must_use]
    pub fn num_arcs(&self) -> usize {
        self.col_indices.len()
    }

    /// Whether explicit arc weights are stored
    #[must_use]
    pub const fn is_weighted(&self) -> bool {
        self.edge_weights.is_some()
    }

    /// Sum of all node degrees
    #[must_use]
    pub const fn total_volume(&self) -> f64 {
        self.total_volume
    }

    /// Weighted degree of every node, indexed by node id
    #[must_use]
    pub fn degrees(&self) -> &[f64] {
        &self.degrees
    }

    /// Check that a node id names a node of this graph
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::VertexOutOfRange`] otherwise
    pub fn check_node(&self, node: NodeId) -> Result<usize> {
        if node.0 < self.num_nodes {
            Ok(node.0)
        } else {
            Err(ClusterError::VertexOutOfRange {
                vertex: node.0,
                num_nodes: self.num_nodes,
            })
        }
    }

    /// Weighted degree of a node
    ///
    /// # Errors
    ///
    /// Returns error if node ID is out of bounds
    pub fn degree(&self, node: NodeId) -> Result<f64> {
        let idx = self.check_node(node)?;
        Ok(self.degrees[idx])
    }

    /// Get outgoing neighbors of a node
    ///
    /// # Errors
    ///
    /// Returns error if node ID is out of bounds
    pub fn outgoing_neighbors(&self, node: NodeId) -> Result<&[V]> {
        let idx = self.check_node(node)?;
        let (start, end) = self.arc_range(idx);
        Ok(&self.col_indices[start..end])
    }

    /// Iterate over `(target, weight)` for the arcs of `node`
    ///
    /// `node` must be in range; kernels validate ids before calling this.
    pub(crate) fn arcs(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (start, end) = self.arc_range(node);
        let weights = self.edge_weights.as_deref();
        self.col_indices[start..end]
            .iter()
            .enumerate()
            .map(move |(i, t)| (t.index(), weights.map_or(1.0, |w| w[start + i])))
    }

    #[inline]
    fn arc_range(&self, node: usize) -> (usize, usize) {
        (
            self.row_offsets[node].index(),
            self.row_offsets[node + 1].index(),
        )
    }

    /// Whether every arc `u → v` has a reverse arc `v → u` of equal total weight
    ///
    /// Parallel arcs are summed before comparing.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        let mut pair_weights: HashMap<(usize, usize), f64> = HashMap::new();
        for u in 0..self.num_nodes {
            for (v, w) in self.arcs(u) {
                *pair_weights.entry((u, v)).or_insert(0.0) += w;
            }
        }
        pair_weights.iter().all(|(&(u, v), &w)| {
            pair_weights
                .get(&(v, u))
                .is_some_and(|&back| (back - w).abs() <= 1e-12 * w.abs().max(1.0))
        })
    }

    /// Get CSR components `(ai, aj, a)`
    #[must_use]
    pub fn csr_components(&self) -> (&[E], &[V], Option<&[f64]>) {
        (
            &self.row_offsets,
            &self.col_indices,
            self.edge_weights.as_deref(),
        )
    }
}

/// `max id + 1`, or 0 without ids; checked before anything is allocated
fn node_count<V: GraphIndex>(ids: impl Iterator<Item = usize>) -> Result<usize> {
    let Some(max_id) = ids.max() else {
        return Ok(0);
    };
    to_index::<V>(max_id)?;
    max_id
        .checked_add(1)
        .ok_or(ClusterError::IndexOverflow { value: max_id })
}

fn to_index<I: GraphIndex>(value: usize) -> Result<I> {
    I::from_index(value).ok_or(ClusterError::IndexOverflow { value })
}
