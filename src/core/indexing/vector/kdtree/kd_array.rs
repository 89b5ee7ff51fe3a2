// src/core/indexing/vector/kdtree/kd_array.rs

//! Point set augmented with one sorted permutation per axis.
//!
//! A `KdArray` borrows the caller's points and never copies them. Every axis
//! keeps the set's members ordered ascending by that axis's coordinate, so the
//! builder can read a median in O(1) and split in O(d·n) without re-sorting.

use std::cmp::Ordering;

use super::error::{try_with_capacity, KdTreeError};
use crate::core::types::Point;

/// An indexed view over a subset of a borrowed point slice.
///
/// Members are addressed by *local* index `0..len()`. `members[local]` is the
/// member's position in the borrowed slice, and `sorted[axis]` lists local
/// indices in ascending coordinate order along `axis` (ties by identifier,
/// then by position).
#[derive(Debug, Clone)]
pub struct KdArray<'a> {
    points: &'a [Point],
    members: Vec<usize>,
    sorted: Vec<Vec<usize>>,
    dimension: usize,
}

impl<'a> KdArray<'a> {
    /// Builds the indexed set over every point in `points`.
    ///
    /// Costs O(d · n log n).
    ///
    /// # Errors
    ///
    /// * `KdTreeError::InvalidInput` if `dimension` is 0, a point does not have
    ///   exactly `dimension` coordinates, or a coordinate is not finite.
    /// * `KdTreeError::AllocationFailure` if the permutations cannot be allocated.
    pub fn new(points: &'a [Point], dimension: usize) -> Result<Self, KdTreeError> {
        if dimension == 0 {
            return Err(KdTreeError::InvalidInput("Dimension cannot be 0.".to_string()));
        }
        for (position, point) in points.iter().enumerate() {
            if point.dimension() != dimension {
                return Err(KdTreeError::InvalidInput(format!(
                    "Expected dimension {}, but point {} (position {}) has dimension {}.",
                    dimension,
                    point.id(),
                    position,
                    point.dimension()
                )));
            }
            if point.coordinates().iter().any(|c| !c.is_finite()) {
                return Err(KdTreeError::InvalidInput(format!(
                    "Point {} (position {}) has a non-finite coordinate.",
                    point.id(),
                    position
                )));
            }
        }

        let n = points.len();
        let mut members = try_with_capacity(n, "kd-array members")?;
        members.extend(0..n);

        let mut sorted = try_with_capacity(dimension, "kd-array axes")?;
        for axis in 0..dimension {
            let mut order: Vec<usize> = try_with_capacity(n, "kd-array axis permutation")?;
            order.extend(0..n);
            order.sort_by(|&a, &b| compare_on_axis(points, a, b, axis));
            sorted.push(order);
        }

        Ok(Self { points, members, sorted, dimension })
    }

    /// Number of points in this set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// The point at local index `i`.
    #[must_use]
    pub fn point(&self, i: usize) -> Option<&'a Point> {
        let points = self.points;
        self.members.get(i).map(|&position| &points[position])
    }

    /// Position, in the slice the set was built from, of the point at local index `i`.
    #[must_use]
    pub fn position(&self, i: usize) -> Option<usize> {
        self.members.get(i).copied()
    }

    /// Positions of the members in ascending order along `axis`.
    #[must_use]
    pub fn sorted_positions(&self, axis: usize) -> Option<Vec<usize>> {
        self.sorted
            .get(axis)
            .map(|order| order.iter().map(|&local| self.members[local]).collect())
    }

    /// Coordinate of the member ranked `rank` along `axis`.
    fn coordinate_at_rank(&self, axis: usize, rank: usize) -> Option<f64> {
        let local = *self.sorted.get(axis)?.get(rank)?;
        self.points[self.members[local]].coordinate(axis)
    }

    /// Difference between the largest and smallest coordinate on `axis`.
    ///
    /// `None` for an empty set or an out-of-range axis.
    #[must_use]
    pub fn spread(&self, axis: usize) -> Option<f64> {
        let last = self.len().checked_sub(1)?;
        let lo = self.coordinate_at_rank(axis, 0)?;
        let hi = self.coordinate_at_rank(axis, last)?;
        Some(hi - lo)
    }

    /// Coordinate of the split boundary on `axis`: the member at rank
    /// `⌈n/2⌉ − 1`. `None` for an empty set or an out-of-range axis.
    #[must_use]
    pub fn median(&self, axis: usize) -> Option<f64> {
        let rank = self.left_len().checked_sub(1)?;
        self.coordinate_at_rank(axis, rank)
    }

    /// Size of the left half produced by [`split`](Self::split).
    fn left_len(&self) -> usize {
        self.members.len().div_ceil(2)
    }

    /// Splits the set around the median of `axis`.
    ///
    /// The first `⌈n/2⌉` members in `axis` order go left, the remaining `⌊n/2⌋`
    /// go right. Every axis permutation keeps its relative order inside each
    /// half, so neither half is re-sorted. Costs O(d · n).
    ///
    /// # Errors
    ///
    /// * `KdTreeError::InvalidArgument` if `axis >= dimension`.
    /// * `KdTreeError::AllocationFailure` if the halves cannot be allocated.
    pub fn split(&self, axis: usize) -> Result<(Self, Self), KdTreeError> {
        if axis >= self.dimension {
            return Err(KdTreeError::InvalidArgument(format!(
                "Split axis {} is out of bounds for dimension {}.",
                axis, self.dimension
            )));
        }

        let n = self.len();
        let left_len = self.left_len();
        let right_len = n - left_len;

        let mut goes_left: Vec<bool> = try_with_capacity(n, "kd-array split sides")?;
        goes_left.resize(n, false);
        for &local in &self.sorted[axis][..left_len] {
            goes_left[local] = true;
        }

        // New local index of every member inside its own half.
        let mut remap: Vec<usize> = try_with_capacity(n, "kd-array split remap")?;
        let mut left_members: Vec<usize> = try_with_capacity(left_len, "kd-array left members")?;
        let mut right_members: Vec<usize> = try_with_capacity(right_len, "kd-array right members")?;
        for (local, &position) in self.members.iter().enumerate() {
            if goes_left[local] {
                remap.push(left_members.len());
                left_members.push(position);
            } else {
                remap.push(right_members.len());
                right_members.push(position);
            }
        }

        let mut left_sorted = try_with_capacity(self.dimension, "kd-array left axes")?;
        let mut right_sorted = try_with_capacity(self.dimension, "kd-array right axes")?;
        for order in &self.sorted {
            let mut left_order: Vec<usize> = try_with_capacity(left_len, "kd-array left permutation")?;
            let mut right_order: Vec<usize> = try_with_capacity(right_len, "kd-array right permutation")?;
            for &local in order {
                if goes_left[local] {
                    left_order.push(remap[local]);
                } else {
                    right_order.push(remap[local]);
                }
            }
            left_sorted.push(left_order);
            right_sorted.push(right_order);
        }

        Ok((
            Self {
                points: self.points,
                members: left_members,
                sorted: left_sorted,
                dimension: self.dimension,
            },
            Self {
                points: self.points,
                members: right_members,
                sorted: right_sorted,
                dimension: self.dimension,
            },
        ))
    }
}

/// Orders two positions by coordinate on `axis`, then identifier, then position.
fn compare_on_axis(points: &[Point], a: usize, b: usize, axis: usize) -> Ordering {
    let pa = &points[a];
    let pb = &points[b];
    let ca = pa.coordinates()[axis];
    let cb = pb.coordinates()[axis];
    ca.total_cmp(&cb).then_with(|| pa.id().cmp(&pb.id())).then_with(|| a.cmp(&b))
}
