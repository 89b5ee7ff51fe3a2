// src/core/indexing/vector/kdtree/builder.rs

//! Logic for building a KD-Tree from an indexed point set.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::KdTreeError;
use super::kd_array::KdArray;
use super::split_policy::SplitPolicy;
use super::tree::{KdNode, KdTree};
use crate::core::types::Point;

/// Immutable build settings derived from the retrieval configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TreeConfig {
    pub policy: SplitPolicy,
    /// Seed for the generator `SplitPolicy::Random` draws from.
    pub seed: u64,
}

impl TreeConfig {
    #[must_use]
    pub const fn new(policy: SplitPolicy, seed: u64) -> Self {
        Self { policy, seed }
    }
}

/// Builds a KD-Tree from an indexed point set.
///
/// One leaf is created per point. Each internal node splits its set at the
/// median of the axis chosen by `policy`, sending `⌈n/2⌉` points left and
/// `⌊n/2⌋` right, so a build over `n` points has depth `⌈log2 n⌉`.
///
/// Construction is all-or-nothing: on error no part of the tree is returned.
///
/// # Arguments
/// * `array`: The indexed point set. It is consumed; each level's halves are
///   released as soon as their subtrees are built.
/// * `policy`: Split-axis rule.
/// * `rng`: Generator used by `SplitPolicy::Random`; ignored by the others.
///
/// # Errors
/// Returns `KdTreeError::AllocationFailure` if splitting runs out of memory.
pub fn build_kdtree<'a, R: Rng + ?Sized>(
    array: KdArray<'a>,
    policy: SplitPolicy,
    rng: &mut R,
) -> Result<KdTree<'a>, KdTreeError> {
    let dimension = array.dimension();
    let len = array.len();

    let root = build_recursive(array, policy, 0, rng)?;
    let tree = KdTree { root: root.map(Box::new), dimension, len };

    debug!(points = len, dimension, policy = %policy, depth = tree.depth(), "built kd-tree");
    Ok(tree)
}

/// Recursively builds the subtree for `array`; `None` for an empty set.
fn build_recursive<'a, R: Rng + ?Sized>(
    array: KdArray<'a>,
    policy: SplitPolicy,
    depth: usize,
    rng: &mut R,
) -> Result<Option<KdNode<'a>>, KdTreeError> {
    match array.len() {
        0 => return Ok(None),
        1 => {
            return Ok(array
                .point(0)
                .zip(array.position(0))
                .map(|(point, position)| KdNode::Leaf { point, position }));
        }
        _ => {}
    }

    let split_dimension = policy.select_axis(&array, depth, rng);
    let median_value = array.median(split_dimension).ok_or_else(|| {
        KdTreeError::InvalidArgument(format!("Split axis {split_dimension} has no median."))
    })?;
    let (left_array, right_array) = array.split(split_dimension)?;
    drop(array);

    let left = build_recursive(left_array, policy, depth + 1, rng)?;
    let right = build_recursive(right_array, policy, depth + 1, rng)?;

    Ok(match (left, right) {
        (Some(left), Some(right)) => Some(KdNode::Internal {
            split_dimension,
            median_value,
            left: Box::new(left),
            right: Box::new(right),
        }),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    })
}

impl<'a> KdTree<'a> {
    /// Indexes `points` and builds a tree with the configured policy, seeding
    /// the `Random` policy's generator from `config.seed`.
    ///
    /// # Errors
    /// Returns `KdTreeError::InvalidInput` for a zero dimension or points of
    /// another dimension, and `KdTreeError::AllocationFailure` if indexing or
    /// building runs out of memory.
    pub fn build(points: &'a [Point], dimension: usize, config: &TreeConfig) -> Result<Self, KdTreeError> {
        let array = KdArray::new(points, dimension)?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        build_kdtree(array, config.policy, &mut rng)
    }
}
