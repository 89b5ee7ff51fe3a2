// src/core/indexing/vector/kdtree/mod.rs

//! KD-Tree implementation for exact K-Nearest Neighbor search.
//!
//! Building goes through three stages: [`KdArray::new`] sorts the points once
//! per axis, [`build_kdtree`] recursively splits the array at the median of the
//! axis chosen by a [`SplitPolicy`], and [`find_knn`] walks the finished tree
//! with a [`BoundedPriorityQueue`], pruning every subtree whose splitting
//! hyperplane is farther away than the current k-th best candidate.

pub use self::bpq::{BoundedPriorityQueue, Neighbor};
pub use self::builder::{build_kdtree, TreeConfig};
pub use self::error::KdTreeError;
pub use self::kd_array::KdArray;
pub use self::search::find_knn;
pub use self::split_policy::SplitPolicy;
pub use self::tree::{KdNode, KdTree};

use super::KnnIndex;

mod bpq;
mod builder;
mod error;
mod kd_array;
mod search;
mod split_policy;
mod tree;

pub(crate) use self::error::try_with_capacity;
pub(crate) use self::search::validate_query;

#[cfg(test)]
mod tests;

impl KnnIndex for KdTree<'_> {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.len
    }

    fn search_knn(&self, query: &[f64], k: usize) -> Result<Vec<Neighbor>, KdTreeError> {
        find_knn(self, query, k)
    }
}
