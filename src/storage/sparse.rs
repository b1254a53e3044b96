//! Sparse score vectors
//!
//! Two types with implicit zeros outside their support:
//!
//! - [`SparseVector`]: distinct ids with finite values, in caller order
//! - [`RankedVector`]: the same, sorted by value descending
//!
//! Neither type exposes a mutation that could break its invariants.

use super::NodeId;
use crate::error::{ClusterError, Result};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Sparse vector over node ids (unique ids, finite values, caller order)
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SparseVector {
    ids: Vec<NodeId>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Build from parallel id/value arrays
    ///
    /// # Errors
    ///
    /// Returns error if lengths differ, an id repeats, or a value is not finite
    pub fn from_parts(ids: Vec<NodeId>, values: Vec<f64>) -> Result<Self> {
        if ids.len() != values.len() {
            return Err(ClusterError::LengthMismatch {
                what: "sparse vector values",
                expected: ids.len(),
                actual: values.len(),
            });
        }
        ensure_distinct(&ids)?;
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(ClusterError::InvalidScore {
                vertex: ids[pos].0,
                value: values[pos],
            });
        }
        Ok(Self { ids, values })
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no entries are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Stored ids
    #[must_use]
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Stored values, parallel to [`ids`](Self::ids)
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over `(id, value)` pairs in stored order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.ids.iter().copied().zip(self.values.iter().copied())
    }

    /// Sort by value descending; equal values keep their stored order
    #[must_use]
    pub fn into_ranked(self) -> RankedVector {
        RankedVector::from_unique_entries(self.ids.into_iter().zip(self.values).collect())
    }
}

/// Descending order on finite scores; `0.0` and `-0.0` compare equal
pub(crate) fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Sparse vector sorted by value descending
///
/// Produced by [`SparseVector::into_ranked`] and by the push solver. Feeding
/// one into the sweep scanner needs no further sorting.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RankedVector {
    ids: Vec<NodeId>,
    values: Vec<f64>,
}

impl RankedVector {
    /// Stable descending sort of entries whose ids are already distinct
    pub(crate) fn from_unique_entries(mut entries: Vec<(NodeId, f64)>) -> Self {
        entries.sort_by(|a, b| descending(a.1, b.1));
        let (ids, values) = entries.into_iter().unzip();
        Self { ids, values }
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no entries are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids, highest value first
    #[must_use]
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Values, non-increasing
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over `(id, value)` pairs, highest value first
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.ids.iter().copied().zip(self.values.iter().copied())
    }

    /// Value stored for `node`, `0.0` outside the support (linear scan)
    #[must_use]
    pub fn get(&self, node: NodeId) -> f64 {
        self.ids
            .iter()
            .position(|&id| id == node)
            .map_or(0.0, |pos| self.values[pos])
    }

    /// Sum of all stored values
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Keep only the `len` highest entries
    pub fn truncate(&mut self, len: usize) {
        self.ids.truncate(len);
        self.values.truncate(len);
    }

    /// Scatter into a dense vector of length `num_nodes`
    ///
    /// # Errors
    ///
    /// Returns error if an id is `>= num_nodes`
    pub fn to_dense(&self, num_nodes: usize) -> Result<Vec<f64>> {
        let mut dense = vec![0.0; num_nodes];
        for (id, value) in self.iter() {
            let slot = dense.get_mut(id.0).ok_or(ClusterError::VertexOutOfRange {
                vertex: id.0,
                num_nodes,
            })?;
            *slot = value;
        }
        Ok(dense)
    }

    /// Drop the ordering guarantee
    #[must_use]
    pub fn into_sparse(self) -> SparseVector {
        SparseVector {
            ids: self.ids,
            values: self.values,
        }
    }
}

pub(crate) fn ensure_distinct(ids: &[NodeId]) -> Result<()> {
    let mut seen = HashSet::with_capacity(ids.len());
    for &id in ids {
        if !seen.insert(id) {
            return Err(ClusterError::DuplicateVertex(id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[usize]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId).collect()
    }

    #[test]
    fn test_from_parts_rejects_duplicates() {
        let err = SparseVector::from_parts(ids(&[1, 2, 1]), vec![0.1, 0.2, 0.3]).unwrap_err();
        assert_eq!(err, ClusterError::DuplicateVertex(NodeId(1)));
    }

    #[test]
    fn test_from_parts_rejects_length_mismatch() {
        let err = SparseVector::from_parts(ids(&[1, 2]), vec![0.1]).unwrap_err();
        assert!(matches!(err, ClusterError::LengthMismatch { .. }));
    }

    #[test]
    fn test_from_parts_rejects_nan() {
        let err = SparseVector::from_parts(ids(&[4]), vec![f64::NAN]).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidScore { vertex: 4, .. }));
    }

    #[test]
    fn test_into_ranked_is_stable() {
        let vector =
            SparseVector::from_parts(ids(&[5, 3, 9, 1]), vec![0.2, 0.5, 0.2, 0.7]).unwrap();
        let ranked = vector.into_ranked();

        assert_eq!(ranked.ids(), ids(&[1, 3, 5, 9]).as_slice());
        assert_eq!(ranked.values(), &[0.7, 0.5, 0.2, 0.2]);
    }

    #[test]
    fn test_into_ranked_signed_zeros_tie() {
        let vector = SparseVector::from_parts(ids(&[7, 2, 4]), vec![-0.0, 0.0, 0.1]).unwrap();
        let ranked = vector.into_ranked();

        assert_eq!(ranked.ids(), ids(&[4, 7, 2]).as_slice());
    }

    #[test]
    fn test_ranked_helpers() {
        let mut ranked = SparseVector::from_parts(ids(&[0, 2]), vec![0.25, 0.5])
            .unwrap()
            .into_ranked();

        assert_eq!(ranked.get(NodeId(2)), 0.5);
        assert_eq!(ranked.get(NodeId(1)), 0.0);
        assert!((ranked.sum() - 0.75).abs() < 1e-12);
        assert_eq!(ranked.to_dense(3).unwrap(), vec![0.25, 0.0, 0.5]);
        assert!(ranked.to_dense(2).is_err());

        ranked.truncate(1);
        assert_eq!(ranked.ids(), &[NodeId(2)]);
        assert_eq!(ranked.into_sparse().len(), 1);
    }
}
