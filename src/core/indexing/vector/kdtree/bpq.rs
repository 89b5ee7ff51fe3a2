// src/core/indexing/vector/kdtree/bpq.rs

//! Fixed-capacity candidate set used by the KNN search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use super::error::KdTreeError;

/// A search hit: the point's identifier and its squared distance to the query.
///
/// Neighbors order by distance, then identifier, then position, which is the
/// order results are returned in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: usize,
    /// Squared Euclidean distance to the query.
    pub distance: f64,
    /// Position of the point in the slice the index was built over.
    pub position: usize,
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
            .then_with(|| self.position.cmp(&other.position))
    }
}

/// Keeps the `capacity` smallest neighbors pushed into it.
///
/// Backed by a max-heap so the current worst candidate is at the top.
#[derive(Debug)]
pub struct BoundedPriorityQueue {
    capacity: usize,
    heap: BinaryHeap<Neighbor>,
}

impl BoundedPriorityQueue {
    /// # Errors
    /// * `KdTreeError::InvalidArgument` if `capacity` is 0.
    /// * `KdTreeError::AllocationFailure` if the storage cannot be reserved.
    pub fn try_new(capacity: usize) -> Result<Self, KdTreeError> {
        if capacity == 0 {
            return Err(KdTreeError::InvalidArgument("Candidate set capacity must be positive.".to_string()));
        }
        let mut heap = BinaryHeap::new();
        heap.try_reserve_exact(capacity)
            .map_err(|e| KdTreeError::allocation("candidate set", &e))?;
        Ok(Self { capacity, heap })
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// The worst (largest) candidate currently held.
    #[must_use]
    pub fn worst(&self) -> Option<&Neighbor> {
        self.heap.peek()
    }

    /// Distance of the worst candidate, `None` while empty.
    #[must_use]
    pub fn max_distance(&self) -> Option<f64> {
        self.heap.peek().map(|n| n.distance)
    }

    /// Offers a candidate. When full, it replaces the current worst only if it
    /// orders strictly before it. Returns whether the candidate was kept.
    pub fn push(&mut self, candidate: Neighbor) -> bool {
        if !self.is_full() {
            self.heap.push(candidate);
            return true;
        }
        match self.heap.peek_mut() {
            Some(mut worst) if candidate < *worst => {
                *worst = candidate;
                true
            }
            _ => false,
        }
    }

    /// Consumes the set, returning candidates from best to worst.
    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<Neighbor> {
        self.heap.into_sorted_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(id: usize, distance: f64) -> Neighbor {
        Neighbor { id, distance, position: id }
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(matches!(BoundedPriorityQueue::try_new(0), Err(KdTreeError::InvalidArgument(_))));
    }

    #[test]
    fn test_keeps_only_the_smallest() {
        let mut bpq = BoundedPriorityQueue::try_new(3).unwrap();
        for (id, d) in [(0, 9.0), (1, 1.0), (2, 5.0), (3, 7.0), (4, 0.5), (5, 8.0)] {
            bpq.push(n(id, d));
        }
        assert!(bpq.is_full());
        assert_eq!(bpq.max_distance(), Some(5.0));

        let ids: Vec<usize> = bpq.into_sorted_vec().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4, 1, 2]);
    }

    #[test]
    fn test_equal_distance_does_not_evict_smaller_id() {
        let mut bpq = BoundedPriorityQueue::try_new(1).unwrap();
        assert!(bpq.push(n(3, 2.0)));
        assert!(!bpq.push(n(8, 2.0)));
        assert!(bpq.push(n(1, 2.0)));
        assert_eq!(bpq.worst().map(|c| c.id), Some(1));
    }

    #[test]
    fn test_partial_fill() {
        let mut bpq = BoundedPriorityQueue::try_new(5).unwrap();
        assert!(bpq.is_empty());
        assert_eq!(bpq.max_distance(), None);
        bpq.push(n(0, 4.0));
        bpq.push(n(1, 2.0));
        assert_eq!(bpq.len(), 2);
        assert!(!bpq.is_full());
        assert_eq!(bpq.capacity(), 5);
        let sorted = bpq.into_sorted_vec();
        assert_eq!(sorted[0].id, 1);
        assert_eq!(sorted[1].id, 0);
    }

    #[test]
    fn test_neighbor_ordering() {
        assert!(n(5, 1.0) < n(1, 2.0));
        assert!(n(1, 2.0) < n(5, 2.0));
        assert_eq!(n(2, 3.0), n(2, 3.0));
    }
}
