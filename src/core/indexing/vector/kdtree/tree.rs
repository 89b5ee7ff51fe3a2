// src/core/indexing/vector/kdtree/tree.rs

//! Defines the core KD-Tree structures: `KdNode` and `KdTree`.

use crate::core::types::Point;

/// A node in the KD-Tree.
///
/// Internal nodes own both children; leaves borrow a single point from the
/// slice the tree was built over.
#[derive(Debug)]
pub enum KdNode<'a> {
    Internal {
        /// Axis the node partitions on.
        split_dimension: usize,
        /// Coordinate of the last point sent left. Every left point is `<=`
        /// this value on `split_dimension`, every right point is `>=` it.
        median_value: f64,
        left: Box<KdNode<'a>>,
        right: Box<KdNode<'a>>,
    },
    Leaf {
        point: &'a Point,
        /// Position of `point` in the slice the tree was built over.
        position: usize,
    },
}

impl KdNode<'_> {
    /// Edges on the longest root-to-leaf path below this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of leaves below this node.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Identifiers of the leaves below this node, left to right.
    #[must_use]
    pub fn point_ids(&self) -> Vec<usize> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<usize>) {
        match self {
            Self::Leaf { point, .. } => ids.push(point.id()),
            Self::Internal { left, right, .. } => {
                left.collect_ids(ids);
                right.collect_ids(ids);
            }
        }
    }
}

/// An immutable KD-Tree over a borrowed point slice.
///
/// Built once by [`build_kdtree`](super::build_kdtree) and read-only
/// afterwards, so a single tree can serve concurrent queries from several
/// threads.
#[derive(Debug)]
pub struct KdTree<'a> {
    pub(super) root: Option<Box<KdNode<'a>>>,
    pub(super) dimension: usize,
    pub(super) len: usize,
}

impl<'a> KdTree<'a> {
    /// Creates an empty tree for points of `dimension` coordinates.
    #[must_use]
    pub const fn empty(dimension: usize) -> Self {
        Self { root: None, dimension, len: 0 }
    }

    /// Dimensionality of the indexed points.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of points in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn root(&self) -> Option<&KdNode<'a>> {
        self.root.as_deref()
    }

    /// Edges on the longest root-to-leaf path; 0 for empty and single-point trees.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.depth())
    }

    /// Identifiers of all indexed points in leaf order.
    #[must_use]
    pub fn point_ids(&self) -> Vec<usize> {
        self.root.as_ref().map_or_else(Vec::new, |root| root.point_ids())
    }
}
