// src/core/indexing/vector/mod.rs

use std::fmt::Debug;

pub mod kdtree;
pub mod linear;

use self::kdtree::{KdTreeError, Neighbor};

/// Trait for vector indexes answering exact K-Nearest Neighbor queries.
pub trait KnnIndex: Debug + Send + Sync {
    /// Returns the dimension of vectors this index handles.
    fn dimension(&self) -> usize;

    /// Returns the number of indexed points.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Performs a K-Nearest Neighbor search.
    ///
    /// Returns up to `k` neighbors ordered by squared distance, ties broken
    /// by identifier.
    fn search_knn(&self, query: &[f64], k: usize) -> Result<Vec<Neighbor>, KdTreeError>;
}
