// src/core/indexing/vector/linear.rs

//! Brute-force index scanning every point.

use super::kdtree::{try_with_capacity, validate_query, KdTreeError, Neighbor};
use super::KnnIndex;
use crate::core::types::Point;
use crate::core::vector::similarity::squared_distance;

/// Exact KNN by scoring every point and keeping the `k` best.
///
/// Used as the reference answer the KD-Tree must reproduce.
#[derive(Debug, Clone)]
pub struct LinearScanIndex<'a> {
    points: &'a [Point],
    dimension: usize,
}

impl<'a> LinearScanIndex<'a> {
    /// # Errors
    /// Returns `KdTreeError::InvalidInput` if `dimension` is 0 or a point has
    /// another dimension.
    pub fn new(points: &'a [Point], dimension: usize) -> Result<Self, KdTreeError> {
        if dimension == 0 {
            return Err(KdTreeError::InvalidInput("Dimension cannot be 0.".to_string()));
        }
        if let Some(point) = points.iter().find(|p| p.dimension() != dimension) {
            return Err(KdTreeError::InvalidInput(format!(
                "Expected dimension {}, but point {} has dimension {}.",
                dimension,
                point.id(),
                point.dimension()
            )));
        }
        Ok(Self { points, dimension })
    }
}

impl KnnIndex for LinearScanIndex<'_> {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn search_knn(&self, query: &[f64], k: usize) -> Result<Vec<Neighbor>, KdTreeError> {
        if k == 0 {
            return Err(KdTreeError::InvalidArgument("k must be positive.".to_string()));
        }
        if self.points.is_empty() {
            return Ok(Vec::new());
        }
        validate_query(self.dimension, query, k)?;

        let mut all: Vec<Neighbor> = try_with_capacity(self.points.len(), "linear scan results")?;
        all.extend(self.points.iter().enumerate().map(|(position, point)| Neighbor {
            id: point.id(),
            distance: squared_distance(query, point.coordinates()),
            position,
        }));
        all.sort_unstable();
        all.truncate(k);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scan_orders_by_distance_then_id() {
        let points = vec![
            Point::new(4, vec![1.0, 0.0]).unwrap(),
            Point::new(2, vec![0.0, 1.0]).unwrap(),
            Point::new(9, vec![3.0, 3.0]).unwrap(),
        ];
        let index = LinearScanIndex::new(&points, 2).unwrap();
        let result = index.search_knn(&[0.0, 0.0], 2).unwrap();
        let ids: Vec<usize> = result.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 4]);
        assert_eq!(result[0].distance, 1.0);
    }

    #[test]
    fn test_linear_scan_rejects_mixed_dimensions() {
        let points = vec![Point::new(0, vec![1.0]).unwrap(), Point::new(1, vec![1.0, 2.0]).unwrap()];
        assert!(matches!(LinearScanIndex::new(&points, 1), Err(KdTreeError::InvalidInput(_))));
    }
}
