//! seedclust: local graph clustering over CSR graphs
//!
//! # Overview
//!
//! Two kernels for finding a community around a set of seed vertices
//! without touching the whole graph:
//!
//! - **Approximate personalized `PageRank`** by local push
//!   ([`approximate_pagerank`]): a sparse, seed-biased score vector
//! - **Sweep cut** ([`sweep_cut`]): the minimum-conductance prefix of any
//!   vertex ordering
//!
//! [`seeded_cluster`] chains the two.
//!
//! # Quick Start
//!
//! ```
//! use seedclust::{approximate_pagerank, sweep_cut, CsrGraph, NodeId, PushConfig, SweepOrder};
//!
//! # fn example() -> seedclust::Result<()> {
//! // Path 0 - 1 - 2 - 3 - 4
//! let graph: CsrGraph = CsrGraph::from_csr(
//!     5,
//!     vec![0, 1, 3, 5, 7, 8],
//!     vec![1, 0, 2, 1, 3, 2, 4, 3],
//!     None,
//! )?;
//!
//! let config = PushConfig::default().with_alpha(0.85).with_eps(1e-4).with_max_steps(100);
//! let scores = approximate_pagerank(&graph, &[NodeId(0)], &config)?;
//!
//! let best = sweep_cut(&graph, SweepOrder::from(&scores.vector), None)?;
//! assert_eq!(best.set[0], NodeId(0));
//! assert!(best.conductance > 0.0 && best.conductance < 1.0);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Architecture
//!
//! - **Storage**: CSR graph generic over index width, sparse score vectors
//! - **Algorithms**: push solver, sweep scanner, seeded clustering pipeline
//! - **Errors**: one structured [`ClusterError`]; non-convergence and
//!   capacity truncation are result flags, not errors

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod error;
pub mod storage;

// Re-export core types
pub use algorithms::{
    approximate_pagerank, cluster_many, conductance, seeded_cluster, sweep_cut, Cluster,
    PushConfig, PushMode, PushResult, SweepCut, SweepOrder, DEGENERATE_CONDUCTANCE,
};
pub use error::{ClusterError, Result};
pub use storage::{CsrGraph, GraphIndex, NodeId, RankedVector, SparseVector};
