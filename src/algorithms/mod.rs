//! Local clustering algorithms (push `PageRank`, sweep cuts, seeded clusters)
//!
//! Every entry point is a pure function of its inputs: no shared state, no
//! I/O. Independent calls may run concurrently on the same graph.

pub mod cluster;
pub mod ppr;
pub mod sweep;

pub use cluster::{cluster_many, seeded_cluster, Cluster};
pub use ppr::{approximate_pagerank, PushConfig, PushMode, PushResult};
pub use sweep::{conductance, sweep_cut, SweepCut, SweepOrder, DEGENERATE_CONDUCTANCE};
