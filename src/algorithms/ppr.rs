//! Approximate personalized `PageRank` via local push
//!
//! Based on Andersen, Chung & Lang (2006) "Local Graph Partitioning using
//! `PageRank` Vectors". Only vertices that receive residual mass are ever
//! touched, so the cost depends on `1 / (alpha * eps)` rather than on the
//! size of the graph.
//!
//! # Algorithm
//!
//! ```text
//! r = uniform mass on the seeds, p = 0
//! while some v has r[v] > eps * d(v):
//!     p[v] += alpha * r[v]
//!     for each arc (v, u, w): r[u] += (1 - alpha) * r[v] * w / d(v)
//!     r[v] = 0
//! ```
//!
//! Every push moves mass from `r` to `p` or along arcs, so
//! `sum(p) + sum(r) = 1` throughout.

use crate::error::{ClusterError, Result};
use crate::storage::{CsrGraph, GraphIndex, NodeId, RankedVector};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

/// Default teleport probability (complement of the usual 0.85 damping)
pub const DEFAULT_ALPHA: f64 = 0.15;

/// Default residual-per-degree threshold
pub const DEFAULT_EPS: f64 = 1e-6;

/// Default push budget
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

/// How estimate values are reported and ranked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PushMode {
    /// Raw estimate `p[v]`
    #[default]
    Standard,
    /// Estimate divided by degree, `p[v] / d(v)`
    ///
    /// Removes the bias towards high-degree vertices before a sweep.
    /// Zero-degree vertices keep their raw estimate.
    DegreeNormalized,
}

/// Parameters of a push run
///
/// # Example
///
/// ```
/// use seedclust::{PushConfig, PushMode};
///
/// let config = PushConfig::default()
///     .with_alpha(0.1)
///     .with_eps(1e-5)
///     .with_mode(PushMode::DegreeNormalized);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PushConfig {
    /// Fraction of a vertex's residual kept in its estimate at each push, in `(0, 1)`
    pub alpha: f64,

    /// Residual threshold per unit degree, `> 0`
    pub eps: f64,

    /// Maximum number of push operations
    pub max_steps: usize,

    /// Maximum number of entries returned
    pub capacity: usize,

    /// Output scaling
    pub mode: PushMode,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            eps: DEFAULT_EPS,
            max_steps: DEFAULT_MAX_STEPS,
            capacity: usize::MAX,
            mode: PushMode::Standard,
        }
    }
}

impl PushConfig {
    /// Set the teleport probability
    #[must_use]
    pub const fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the residual threshold
    #[must_use]
    pub const fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Set the push budget
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the maximum number of returned entries
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the output scaling
    #[must_use]
    pub const fn with_mode(mut self, mode: PushMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::InvalidParameter`] if `alpha` is outside
    /// `(0, 1)` or `eps` is not a positive finite number
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ClusterError::InvalidParameter {
                name: "alpha",
                value: self.alpha,
                reason: "must lie in (0, 1)",
            });
        }
        if !(self.eps > 0.0 && self.eps.is_finite()) {
            return Err(ClusterError::InvalidParameter {
                name: "eps",
                value: self.eps,
                reason: "must be positive and finite",
            });
        }
        Ok(())
    }
}

/// Output of [`approximate_pagerank`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PushResult {
    /// Non-zero estimates, highest first, at most `capacity` entries
    pub vector: RankedVector,

    /// Push operations performed
    pub steps: usize,

    /// No vertex was left above its residual threshold
    pub converged: bool,

    /// The support exceeded `capacity` and was cut down
    pub truncated: bool,

    /// Mass still held in residuals (the L1 distance to the exact vector)
    pub residual_mass: f64,
}

/// Compute an approximate personalized `PageRank` vector around `seeds`
///
/// Duplicate seeds count once; the seed distribution is uniform over the
/// distinct seeds. Vertices with zero degree absorb whatever residual they
/// receive.
///
/// # Arguments
///
/// * `graph` - CSR graph, assumed symmetric for the usual interpretation
/// * `seeds` - Seed vertices
/// * `config` - Teleport probability, threshold, budget, capacity and mode
///
/// # Returns
///
/// Estimates sorted by value descending (ties by ascending node id), plus
/// run statistics. Running out of `max_steps` is not an error: the estimate
/// accumulated so far is returned with `converged = false`.
///
/// # Errors
///
/// Returns error if `config` is invalid or a seed is out of range
///
/// # Example
///
/// ```
/// use seedclust::{approximate_pagerank, CsrGraph, NodeId, PushConfig};
///
/// let graph: CsrGraph = CsrGraph::from_undirected_edges(&[
///     (NodeId(0), NodeId(1), 1.0),
///     (NodeId(1), NodeId(2), 1.0),
/// ]).unwrap();
///
/// let result = approximate_pagerank(&graph, &[NodeId(0)], &PushConfig::default()).unwrap();
/// assert!(result.converged);
/// assert_eq!(result.vector.ids()[0], NodeId(0));
/// assert!(result.vector.sum() <= 1.0);
/// ```
pub fn approximate_pagerank<V: GraphIndex, E: GraphIndex>(
    graph: &CsrGraph<V, E>,
    seeds: &[NodeId],
    config: &PushConfig,
) -> Result<PushResult> {
    config.validate()?;

    let mut distinct = Vec::with_capacity(seeds.len());
    let mut seen = HashSet::with_capacity(seeds.len());
    for &seed in seeds {
        let idx = graph.check_node(seed)?;
        if seen.insert(idx) {
            distinct.push(idx);
        }
    }

    if distinct.is_empty() {
        return Ok(PushResult {
            vector: RankedVector::default(),
            steps: 0,
            converged: true,
            truncated: false,
            residual_mass: 0.0,
        });
    }

    let degrees = graph.degrees();
    let above_threshold = |node: usize, mass: f64| mass > config.eps * degrees[node];

    #[allow(clippy::cast_precision_loss)]
    let seed_mass = 1.0 / distinct.len() as f64;

    let mut residual: HashMap<usize, f64> = HashMap::with_capacity(distinct.len());
    let mut estimate: HashMap<usize, f64> = HashMap::new();
    let mut queue = VecDeque::with_capacity(distinct.len());
    let mut queued = HashSet::with_capacity(distinct.len());

    for &seed in &distinct {
        residual.insert(seed, seed_mass);
        if above_threshold(seed, seed_mass) {
            queue.push_back(seed);
            queued.insert(seed);
        }
    }

    let mut steps = 0;
    while steps < config.max_steps {
        let Some(node) = queue.pop_front() else {
            break;
        };
        queued.remove(&node);
        steps += 1;

        let mass = residual.remove(&node).unwrap_or(0.0);
        let degree = degrees[node];

        if degree <= 0.0 {
            // Absorbing vertex: nowhere to spread
            *estimate.entry(node).or_insert(0.0) += mass;
            continue;
        }

        *estimate.entry(node).or_insert(0.0) += config.alpha * mass;
        let spread = (1.0 - config.alpha) * mass / degree;

        for (target, weight) in graph.arcs(node) {
            if weight <= 0.0 {
                continue;
            }
            let slot = residual.entry(target).or_insert(0.0);
            *slot += spread * weight;
            if !queued.contains(&target) && above_threshold(target, *slot) {
                queue.push_back(target);
                queued.insert(target);
            }
        }
    }

    let converged = queue.is_empty();
    // Sum in node order so repeated runs agree bit for bit
    let mut leftover: Vec<(usize, f64)> = residual.into_iter().collect();
    leftover.sort_unstable_by_key(|&(node, _)| node);
    let residual_mass: f64 = leftover.iter().map(|&(_, mass)| mass).sum();

    let mut entries: Vec<(NodeId, f64)> = estimate
        .into_iter()
        .filter(|&(_, value)| value > 0.0)
        .map(|(node, value)| {
            let reported = match config.mode {
                PushMode::DegreeNormalized if degrees[node] > 0.0 => value / degrees[node],
                _ => value,
            };
            (NodeId(node), reported)
        })
        .collect();
    // Fix the tie order before the stable value sort; map order is random
    entries.sort_unstable_by_key(|&(id, _)| id);
    let mut vector = RankedVector::from_unique_entries(entries);

    let support = vector.len();
    let truncated = support > config.capacity;
    if truncated {
        vector.truncate(config.capacity);
        warn!(
            support,
            capacity = config.capacity,
            "push support exceeds capacity, keeping largest entries"
        );
    }
    if !converged {
        warn!(
            steps,
            pending = queue.len(),
            residual_mass,
            "push step budget exhausted before convergence"
        );
    }

    debug!(
        seeds = distinct.len(),
        steps,
        support,
        converged,
        residual_mass,
        "approximate pagerank finished"
    );

    Ok(PushResult {
        vector,
        steps,
        converged,
        truncated,
        residual_mass,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> CsrGraph {
        let edges: Vec<_> = (0..n - 1)
            .map(|i| (NodeId(i), NodeId(i + 1), 1.0))
            .collect();
        CsrGraph::from_undirected_edges(&edges).unwrap()
    }

    fn barbell() -> CsrGraph {
        // Two triangles {0,1,2} and {3,4,5} joined by 2 - 3
        CsrGraph::from_undirected_edges(&[
            (NodeId(0), NodeId(1), 1.0),
            (NodeId(0), NodeId(2), 1.0),
            (NodeId(1), NodeId(2), 1.0),
            (NodeId(2), NodeId(3), 1.0),
            (NodeId(3), NodeId(4), 1.0),
            (NodeId(3), NodeId(5), 1.0),
            (NodeId(4), NodeId(5), 1.0),
        ])
        .unwrap()
    }

    /// Dense fixed-point iteration of p = alpha * s + (1 - alpha) * p * P
    fn exact_ppr(graph: &CsrGraph, seeds: &[usize], alpha: f64) -> Vec<f64> {
        let n = graph.num_nodes();
        let mut s = vec![0.0; n];
        for &seed in seeds {
            s[seed] = 1.0 / seeds.len() as f64;
        }
        let mut p = s.clone();
        for _ in 0..5000 {
            let mut next: Vec<f64> = s.iter().map(|v| alpha * v).collect();
            for v in 0..n {
                let d = graph.degrees()[v];
                for (u, w) in graph.arcs(v) {
                    next[u] += (1.0 - alpha) * p[v] * w / d;
                }
            }
            p = next;
        }
        p
    }

    fn l1_error(result: &PushResult, exact: &[f64]) -> f64 {
        let dense = result.vector.to_dense(exact.len()).unwrap();
        dense.iter().zip(exact).map(|(a, b)| (a - b).abs()).sum()
    }

    #[test]
    fn test_path_scenario() {
        let graph = path(5);
        let config = PushConfig::default()
            .with_alpha(0.85)
            .with_eps(1e-4)
            .with_max_steps(100);

        let result = approximate_pagerank(&graph, &[NodeId(0)], &config).unwrap();

        assert_eq!(result.vector.ids()[0], NodeId(0));
        assert!(result.vector.ids().iter().all(|id| id.0 < 5));
        assert!(result.vector.sum() <= 1.0 + 1e-12);
        assert!(result.steps <= 100);
    }

    #[test]
    fn test_mass_is_conserved() {
        let graph = barbell();
        let config = PushConfig::default().with_eps(1e-3);

        let result = approximate_pagerank(&graph, &[NodeId(0), NodeId(1)], &config).unwrap();

        assert!(result.converged);
        assert!((result.vector.sum() + result.residual_mass - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_values_sorted_descending() {
        let graph = barbell();
        let result =
            approximate_pagerank(&graph, &[NodeId(0)], &PushConfig::default()).unwrap();

        let values = result.vector.values();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        assert!(values.iter().all(|v| *v > 0.0));
    }

    #[test]
    fn test_accuracy_improves_with_smaller_eps() {
        let graph = barbell();
        let exact = exact_ppr(&graph, &[0], DEFAULT_ALPHA);

        let errors: Vec<f64> = [1e-2, 1e-4, 1e-6]
            .iter()
            .map(|&eps| {
                let config = PushConfig::default().with_eps(eps);
                let result = approximate_pagerank(&graph, &[NodeId(0)], &config).unwrap();
                assert!(result.converged);
                l1_error(&result, &exact)
            })
            .collect();

        assert!(errors[1] < errors[0], "errors = {errors:?}");
        assert!(errors[2] < errors[1], "errors = {errors:?}");
        // eps * volume bounds the residual left behind
        assert!(errors[2] <= 1e-6 * graph.total_volume() + 1e-9);
    }

    #[test]
    fn test_residual_mass_is_l1_error() {
        let graph = barbell();
        let exact = exact_ppr(&graph, &[4], DEFAULT_ALPHA);
        let config = PushConfig::default().with_eps(1e-3);

        let result = approximate_pagerank(&graph, &[NodeId(4)], &config).unwrap();

        // p <= exact entrywise, so the L1 gap is exactly the missing mass
        assert!((l1_error(&result, &exact) - result.residual_mass).abs() < 1e-9);
    }

    #[test]
    fn test_isolated_seed_keeps_all_mass() {
        let graph: CsrGraph = CsrGraph::from_csr(4, vec![0; 5], vec![], None).unwrap();

        let result = approximate_pagerank(&graph, &[NodeId(2)], &PushConfig::default()).unwrap();

        assert_eq!(result.vector.ids(), &[NodeId(2)]);
        assert!((result.vector.values()[0] - 1.0).abs() < 1e-15);
        assert_eq!(result.residual_mass, 0.0);
        assert!(result.converged);
    }

    #[test]
    fn test_empty_seed_set() {
        let graph = path(3);
        let result = approximate_pagerank(&graph, &[], &PushConfig::default()).unwrap();

        assert!(result.vector.is_empty());
        assert_eq!(result.steps, 0);
        assert!(result.converged);
    }

    #[test]
    fn test_duplicate_seeds_count_once() {
        let graph = barbell();
        let config = PushConfig::default();

        let once = approximate_pagerank(&graph, &[NodeId(0)], &config).unwrap();
        let twice = approximate_pagerank(&graph, &[NodeId(0), NodeId(0)], &config).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_step_budget_exhausted() {
        let graph = barbell();
        let config = PushConfig::default().with_max_steps(2);

        let result = approximate_pagerank(&graph, &[NodeId(0)], &config).unwrap();

        assert_eq!(result.steps, 2);
        assert!(!result.converged);
        assert!(!result.vector.is_empty());
        assert!(result.residual_mass > 0.0);
    }

    #[test]
    fn test_capacity_keeps_largest() {
        let graph = barbell();
        let full = approximate_pagerank(&graph, &[NodeId(0)], &PushConfig::default()).unwrap();
        let capped = approximate_pagerank(
            &graph,
            &[NodeId(0)],
            &PushConfig::default().with_capacity(2),
        )
        .unwrap();

        assert!(!full.truncated);
        assert!(capped.truncated);
        assert_eq!(capped.vector.ids(), &full.vector.ids()[..2]);
        assert_eq!(capped.vector.values(), &full.vector.values()[..2]);
    }

    #[test]
    fn test_zero_capacity() {
        let graph = barbell();
        let result = approximate_pagerank(
            &graph,
            &[NodeId(0)],
            &PushConfig::default().with_capacity(0),
        )
        .unwrap();

        assert!(result.vector.is_empty());
        assert!(result.truncated);
    }

    #[test]
    fn test_degree_normalized_mode() {
        let graph = barbell();
        let raw = approximate_pagerank(&graph, &[NodeId(0)], &PushConfig::default()).unwrap();
        let normalized = approximate_pagerank(
            &graph,
            &[NodeId(0)],
            &PushConfig::default().with_mode(PushMode::DegreeNormalized),
        )
        .unwrap();

        assert_eq!(raw.vector.len(), normalized.vector.len());
        for (id, value) in normalized.vector.iter() {
            let degree = graph.degree(id).unwrap();
            assert!((value * degree - raw.vector.get(id)).abs() < 1e-15);
        }
        let values = normalized.vector.values();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_invalid_parameters() {
        let graph = path(3);
        for alpha in [0.0, 1.0, -0.5, f64::NAN] {
            let err = approximate_pagerank(
                &graph,
                &[NodeId(0)],
                &PushConfig::default().with_alpha(alpha),
            )
            .unwrap_err();
            assert!(matches!(
                err,
                ClusterError::InvalidParameter { name: "alpha", .. }
            ));
        }
        for eps in [0.0, -1e-3, f64::INFINITY] {
            let err =
                approximate_pagerank(&graph, &[NodeId(0)], &PushConfig::default().with_eps(eps))
                    .unwrap_err();
            assert!(matches!(
                err,
                ClusterError::InvalidParameter { name: "eps", .. }
            ));
        }
    }

    #[test]
    fn test_seed_out_of_range() {
        let graph = path(3);
        let err =
            approximate_pagerank(&graph, &[NodeId(0), NodeId(3)], &PushConfig::default())
                .unwrap_err();
        assert_eq!(
            err,
            ClusterError::VertexOutOfRange {
                vertex: 3,
                num_nodes: 3
            }
        );
    }

    #[test]
    fn test_weighted_spread_follows_weights() {
        // Star centre 0 with a heavy arc to 1 and a light arc to 2
        let graph: CsrGraph = CsrGraph::from_undirected_edges(&[
            (NodeId(0), NodeId(1), 3.0),
            (NodeId(0), NodeId(2), 1.0),
        ])
        .unwrap();
        let config = PushConfig::default().with_max_steps(1);

        let result = approximate_pagerank(&graph, &[NodeId(0)], &config).unwrap();

        // One push from 0: p[0] = alpha, residual split 3:1
        assert_eq!(result.vector.ids(), &[NodeId(0)]);
        assert!((result.vector.values()[0] - DEFAULT_ALPHA).abs() < 1e-15);
        assert!((result.residual_mass - (1.0 - DEFAULT_ALPHA)).abs() < 1e-15);
    }
}
