// src/core/indexing/vector/kdtree/split_policy.rs

//! Choice of split axis at each tree node.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::KdTreeError;
use super::kd_array::KdArray;

/// Rule selecting the axis an internal node splits on.
///
/// The policy only shapes the tree; search results are identical for every
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitPolicy {
    /// Uniformly random axis drawn from the caller's seeded generator.
    Random,
    /// Axis with the largest coordinate spread over the node's points,
    /// lowest axis on ties.
    #[default]
    MaxSpread,
    /// `depth mod d`, the root being depth 0.
    Incremental,
}

impl SplitPolicy {
    /// Configuration-file spelling of the policy.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Random => "RANDOM",
            Self::MaxSpread => "MAX_SPREAD",
            Self::Incremental => "INCREMENTAL",
        }
    }

    /// Picks the split axis for a node holding `array` at `depth`.
    ///
    /// `array` must be non-empty; `rng` is only drawn from by `Random`.
    pub fn select_axis<R: Rng + ?Sized>(&self, array: &KdArray<'_>, depth: usize, rng: &mut R) -> usize {
        let dimension = array.dimension();
        match self {
            Self::Random => rng.gen_range(0..dimension),
            Self::MaxSpread => {
                let mut best_axis = 0;
                let mut best_spread = f64::NEG_INFINITY;
                for axis in 0..dimension {
                    let spread = array.spread(axis).unwrap_or(0.0);
                    if spread > best_spread {
                        best_spread = spread;
                        best_axis = axis;
                    }
                }
                best_axis
            }
            Self::Incremental => depth % dimension,
        }
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SplitPolicy {
    type Err = KdTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RANDOM" => Ok(Self::Random),
            "MAX_SPREAD" => Ok(Self::MaxSpread),
            "INCREMENTAL" => Ok(Self::Incremental),
            other => Err(KdTreeError::InvalidArgument(format!(
                "Unknown split policy '{other}', expected RANDOM, MAX_SPREAD or INCREMENTAL."
            ))),
        }
    }
}
