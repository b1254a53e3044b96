//! Error type for graph construction and clustering kernels
//!
//! Only contract violations are errors. Step-budget exhaustion and capacity
//! truncation are reported as flags on the result types instead.

use crate::storage::NodeId;
use thiserror::Error;

/// Errors reported to callers of the clustering kernels
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    /// CSR arrays violate a structural invariant
    #[error("invalid CSR graph: {reason}")]
    InvalidCsr {
        /// Which invariant failed
        reason: String,
    },

    /// A vertex id does not name a vertex of the graph
    #[error("vertex {vertex} out of range for graph with {num_nodes} nodes")]
    VertexOutOfRange {
        /// Offending id
        vertex: usize,
        /// Graph size
        num_nodes: usize,
    },

    /// A numeric parameter is outside its valid range
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Supplied value
        value: f64,
        /// Accepted range
        reason: &'static str,
    },

    /// The same vertex appears twice where distinct ids are required
    #[error("vertex {0} appears more than once")]
    DuplicateVertex(NodeId),

    /// Two parallel inputs have different lengths
    #[error("{what}: expected length {expected}, got {actual}")]
    LengthMismatch {
        /// Which input
        what: &'static str,
        /// Required length
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// A score or degree is NaN, infinite or negative
    #[error("invalid value {value} for vertex {vertex}")]
    InvalidScore {
        /// Vertex the value belongs to
        vertex: usize,
        /// Offending value
        value: f64,
    },

    /// A count does not fit the graph's index type
    #[error("value {value} does not fit the graph index type")]
    IndexOverflow {
        /// Offending count
        value: usize,
    },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ClusterError>;

impl ClusterError {
    pub(crate) fn invalid_csr(reason: impl Into<String>) -> Self {
        Self::InvalidCsr {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ClusterError::VertexOutOfRange {
            vertex: 9,
            num_nodes: 5,
        };
        assert_eq!(
            err.to_string(),
            "vertex 9 out of range for graph with 5 nodes"
        );

        let err = ClusterError::DuplicateVertex(NodeId(3));
        assert_eq!(err.to_string(), "vertex 3 appears more than once");

        let err = ClusterError::invalid_csr("ai[0] must be 0");
        assert_eq!(err.to_string(), "invalid CSR graph: ai[0] must be 0");
    }
}
