//! Graph storage layer
//!
//! Provides the CSR (Compressed Sparse Row) graph representation, its index
//! widths, and the sparse score vectors the clustering kernels exchange.

pub mod csr;
pub mod index;
pub mod sparse;

pub use csr::{CsrGraph, NodeId};
pub use index::GraphIndex;
pub use sparse::{RankedVector, SparseVector};
