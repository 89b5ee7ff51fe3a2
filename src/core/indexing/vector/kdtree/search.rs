// src/core/indexing/vector/kdtree/search.rs

//! Logic for performing K-Nearest Neighbor (KNN) search in a KD-Tree.

use tracing::trace;

use super::bpq::{BoundedPriorityQueue, Neighbor};
use super::error::KdTreeError;
use super::tree::{KdNode, KdTree};
use crate::core::vector::similarity::squared_distance;

/// Checks the query parameters shared by every KNN index.
pub(crate) fn validate_query(dimension: usize, query: &[f64], k: usize) -> Result<(), KdTreeError> {
    if k == 0 {
        return Err(KdTreeError::InvalidArgument("k must be positive.".to_string()));
    }
    if query.len() != dimension {
        return Err(KdTreeError::InvalidArgument(format!(
            "Query vector dimension {} does not match index dimension {}.",
            query.len(),
            dimension
        )));
    }
    if query.iter().any(|c| !c.is_finite()) {
        return Err(KdTreeError::InvalidArgument("Query vector has a non-finite coordinate.".to_string()));
    }
    Ok(())
}

/// Performs an exact K-Nearest Neighbor search in the KD-Tree.
///
/// # Arguments
/// * `tree`: The tree to search. It is only read, so concurrent searches may
///   share it.
/// * `query`: Coordinates of the query point.
/// * `k`: The number of nearest neighbors to find.
///
/// # Returns
/// The `min(k, n)` nearest points ordered by squared distance, ties broken by
/// identifier and then position. An empty tree yields an empty result.
///
/// # Errors
/// * `KdTreeError::InvalidArgument` if `k` is 0 (checked before anything else),
///   or if a non-empty tree is queried with a vector of another dimension or
///   with non-finite coordinates.
/// * `KdTreeError::AllocationFailure` if the candidate set cannot be allocated.
pub fn find_knn(tree: &KdTree<'_>, query: &[f64], k: usize) -> Result<Vec<Neighbor>, KdTreeError> {
    if k == 0 {
        return Err(KdTreeError::InvalidArgument("k must be positive.".to_string()));
    }
    let Some(root) = tree.root() else {
        return Ok(Vec::new());
    };
    validate_query(tree.dimension(), query, k)?;

    let mut candidates = BoundedPriorityQueue::try_new(k.min(tree.len()))?;
    let mut visited = 0usize;
    search_recursive(root, query, &mut candidates, &mut visited);

    trace!(k, visited, points = tree.len(), "kd-tree knn search finished");
    Ok(candidates.into_sorted_vec())
}

fn search_recursive(
    node: &KdNode<'_>,
    query: &[f64],
    candidates: &mut BoundedPriorityQueue,
    visited: &mut usize,
) {
    match node {
        KdNode::Leaf { point, position } => {
            *visited += 1;
            let distance = squared_distance(query, point.coordinates());
            candidates.push(Neighbor { id: point.id(), distance, position: *position });
        }
        KdNode::Internal { split_dimension, median_value, left, right } => {
            let query_coord = query[*split_dimension];

            // Ties go left, matching the split rule.
            let (near, far) = if query_coord <= *median_value { (left, right) } else { (right, left) };

            search_recursive(near, query, candidates, visited);

            // Every far-side point is at least this far from the query. Equal
            // offsets are still explored so an equally distant point with a
            // smaller identifier can displace the current worst.
            let offset = query_coord - *median_value;
            let plane_distance = offset * offset;
            let must_visit_far = match candidates.max_distance() {
                Some(worst) if candidates.is_full() => plane_distance <= worst,
                _ => true,
            };
            if must_visit_far {
                search_recursive(far, query, candidates, visited);
            }
        }
    }
}

impl KdTree<'_> {
    /// Exact KNN search; see [`find_knn`].
    ///
    /// # Errors
    /// As [`find_knn`].
    pub fn search_knn(&self, query: &[f64], k: usize) -> Result<Vec<Neighbor>, KdTreeError> {
        find_knn(self, query, k)
    }
}
