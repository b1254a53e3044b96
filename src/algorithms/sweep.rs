//! Sweep cuts: minimum-conductance prefix of a vertex ordering
//!
//! Given an ordering `v1, v2, ..., vk`, the sweep evaluates every prefix
//! `S_i = {v1..vi}` in one pass, maintaining volume and cut incrementally:
//!
//! ```text
//! vol(S_i) = vol(S_{i-1}) + d(vi)
//! cut(S_i) = cut(S_{i-1}) + w(vi, outside) - w(vi, S_{i-1})
//! phi(S_i) = cut(S_i) / min(vol(S_i), vol(G) - vol(S_i))
//! ```
//!
//! Cost is proportional to the summed degree of the swept vertices, not to
//! the size of the graph. Cut weights assume a symmetric graph.

use crate::error::{ClusterError, Result};
use crate::storage::sparse::{descending, ensure_distinct};
use crate::storage::{CsrGraph, GraphIndex, NodeId, RankedVector};
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::debug;

/// Conductance reported for prefixes with an empty side, and for an empty ordering
pub const DEGENERATE_CONDUCTANCE: f64 = 1.0;

/// Relative slack below which the complement volume counts as zero
const VOLUME_TOLERANCE: f64 = 1e-12;

/// Vertex ordering to sweep
#[derive(Debug, Clone, Copy)]
pub enum SweepOrder<'a> {
    /// Ids already in sweep order
    Presorted(&'a [NodeId]),

    /// Ids with scores; swept by score descending, equal scores in input order
    Scored {
        /// Vertex ids
        ids: &'a [NodeId],
        /// Score per id
        values: &'a [f64],
    },
}

impl<'a> SweepOrder<'a> {
    /// Whether the scanner has to sort before sweeping
    #[must_use]
    pub const fn needs_sort(&self) -> bool {
        matches!(self, Self::Scored { .. })
    }

    /// Number of vertices in the ordering
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Presorted(ids) | Self::Scored { ids, .. } => ids.len(),
        }
    }

    /// Whether the ordering is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn resolve(self) -> Result<Cow<'a, [NodeId]>> {
        match self {
            Self::Presorted(ids) => Ok(Cow::Borrowed(ids)),
            Self::Scored { ids, values } => {
                if ids.len() != values.len() {
                    return Err(ClusterError::LengthMismatch {
                        what: "sweep scores",
                        expected: ids.len(),
                        actual: values.len(),
                    });
                }
                if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
                    return Err(ClusterError::InvalidScore {
                        vertex: ids[pos].0,
                        value: values[pos],
                    });
                }
                let mut entries: Vec<(NodeId, f64)> =
                    ids.iter().copied().zip(values.iter().copied()).collect();
                entries.sort_by(|a, b| descending(a.1, b.1));
                Ok(Cow::Owned(entries.into_iter().map(|(id, _)| id).collect()))
            }
        }
    }
}

impl<'a> From<&'a RankedVector> for SweepOrder<'a> {
    fn from(vector: &'a RankedVector) -> Self {
        Self::Presorted(vector.ids())
    }
}

/// Best prefix found by [`sweep_cut`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SweepCut {
    /// Vertices of the best prefix, in sweep order
    pub set: Vec<NodeId>,

    /// Conductance of `set`
    pub conductance: f64,

    /// Volume of `set`
    pub volume: f64,

    /// Weight of arcs leaving `set`
    pub cut: f64,

    /// Conductance of every prefix, in sweep order
    pub profile: Vec<f64>,
}

impl SweepCut {
    fn empty() -> Self {
        Self {
            set: Vec::new(),
            conductance: DEGENERATE_CONDUCTANCE,
            volume: 0.0,
            cut: 0.0,
            profile: Vec::new(),
        }
    }

    /// Number of vertices in the best prefix
    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Whether the best prefix is empty (only for an empty ordering)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

/// Find the minimum-conductance prefix of an ordering
///
/// # Arguments
///
/// * `graph` - Symmetric CSR graph
/// * `order` - Vertices to sweep, pre-sorted or with scores
/// * `degree_override` - Optional per-vertex degrees (length `num_nodes`)
///   replacing the structural degree in volumes; the cut always uses arc
///   weights
///
/// # Returns
///
/// The earliest prefix attaining the minimum conductance. Prefixes whose
/// volume or complement volume is zero score [`DEGENERATE_CONDUCTANCE`].
/// An empty ordering yields an empty set with that same value.
///
/// # Errors
///
/// Returns error if an id is out of range or repeated, if scores are
/// mismatched or not finite, or if the degree override is malformed
///
/// # Example
///
/// ```
/// use seedclust::{sweep_cut, CsrGraph, NodeId, SweepOrder};
///
/// // Path 0 - 1 - 2 - 3
/// let graph: CsrGraph = CsrGraph::from_undirected_edges(&[
///     (NodeId(0), NodeId(1), 1.0),
///     (NodeId(1), NodeId(2), 1.0),
///     (NodeId(2), NodeId(3), 1.0),
/// ]).unwrap();
///
/// let order = [NodeId(0), NodeId(1), NodeId(2)];
/// let best = sweep_cut(&graph, SweepOrder::Presorted(&order), None).unwrap();
/// assert_eq!(best.set, vec![NodeId(0), NodeId(1)]);
/// assert!((best.conductance - 1.0 / 3.0).abs() < 1e-12);
/// ```
pub fn sweep_cut<V: GraphIndex, E: GraphIndex>(
    graph: &CsrGraph<V, E>,
    order: SweepOrder<'_>,
    degree_override: Option<&[f64]>,
) -> Result<SweepCut> {
    let degrees = resolve_degrees(graph, degree_override)?;
    let ids = order.resolve()?;

    if ids.is_empty() {
        return Ok(SweepCut::empty());
    }

    let total_volume = total_volume(graph, degree_override);

    let mut members: HashSet<usize> = HashSet::with_capacity(ids.len());
    let mut profile = Vec::with_capacity(ids.len());
    let mut volume = 0.0;
    let mut cut = 0.0;
    let mut best = (0, f64::INFINITY, 0.0, 0.0); // (index, conductance, volume, cut)

    for (i, &id) in ids.iter().enumerate() {
        let node = graph.check_node(id)?;
        if members.contains(&node) {
            return Err(ClusterError::DuplicateVertex(id));
        }

        for (neighbor, weight) in graph.arcs(node) {
            if neighbor == node {
                continue;
            }
            if members.contains(&neighbor) {
                cut -= weight;
            } else {
                cut += weight;
            }
        }
        members.insert(node);
        volume += degrees[node];

        let phi = prefix_conductance(cut, volume, total_volume);
        profile.push(phi);
        if phi < best.1 {
            best = (i, phi, volume, cut);
        }
    }

    let (best_index, conductance, best_volume, best_cut) = best;
    debug!(
        swept = ids.len(),
        size = best_index + 1,
        conductance,
        "sweep cut selected prefix"
    );

    Ok(SweepCut {
        set: ids[..=best_index].to_vec(),
        conductance,
        volume: best_volume,
        cut: best_cut,
        profile,
    })
}

/// Conductance of an arbitrary vertex set
///
/// Direct evaluation in O(vol(set)), using the same degree and degenerate-side
/// conventions as [`sweep_cut`].
///
/// # Errors
///
/// Returns error if an id is out of range or repeated, or if the degree
/// override is malformed
pub fn conductance<V: GraphIndex, E: GraphIndex>(
    graph: &CsrGraph<V, E>,
    set: &[NodeId],
    degree_override: Option<&[f64]>,
) -> Result<f64> {
    let degrees = resolve_degrees(graph, degree_override)?;
    ensure_distinct(set)?;

    let nodes = set
        .iter()
        .map(|&id| graph.check_node(id))
        .collect::<Result<Vec<usize>>>()?;
    if nodes.is_empty() {
        return Ok(DEGENERATE_CONDUCTANCE);
    }
    let members: HashSet<usize> = nodes.iter().copied().collect();

    // Accumulate in caller order so the result does not depend on hashing
    let mut volume = 0.0;
    let mut cut = 0.0;
    for &node in &nodes {
        volume += degrees[node];
        cut += graph
            .arcs(node)
            .filter(|(neighbor, _)| !members.contains(neighbor))
            .map(|(_, weight)| weight)
            .sum::<f64>();
    }

    Ok(prefix_conductance(
        cut,
        volume,
        total_volume(graph, degree_override),
    ))
}

fn resolve_degrees<'g, V: GraphIndex, E: GraphIndex>(
    graph: &'g CsrGraph<V, E>,
    degree_override: Option<&'g [f64]>,
) -> Result<&'g [f64]> {
    let Some(degrees) = degree_override else {
        return Ok(graph.degrees());
    };
    if degrees.len() != graph.num_nodes() {
        return Err(ClusterError::LengthMismatch {
            what: "degree override",
            expected: graph.num_nodes(),
            actual: degrees.len(),
        });
    }
    if let Some(node) = degrees.iter().position(|d| !d.is_finite() || *d < 0.0) {
        return Err(ClusterError::InvalidScore {
            vertex: node,
            value: degrees[node],
        });
    }
    Ok(degrees)
}

fn total_volume<V: GraphIndex, E: GraphIndex>(
    graph: &CsrGraph<V, E>,
    degree_override: Option<&[f64]>,
) -> f64 {
    degree_override.map_or_else(|| graph.total_volume(), |degrees| degrees.iter().sum())
}

fn prefix_conductance(cut: f64, volume: f64, total_volume: f64) -> f64 {
    let complement = total_volume - volume;
    if volume <= 0.0 || complement <= VOLUME_TOLERANCE * total_volume {
        return DEGENERATE_CONDUCTANCE;
    }
    (cut / volume.min(complement)).max(0.0)
}
