// src/core/types/point.rs

use crate::core::common::KdSearchError;
use serde::{Deserialize, Serialize};

/// A fixed-dimension feature vector tagged with the identifier of the
/// gallery image it was extracted from.
///
/// Points are created once by the feature pipeline and only read afterwards;
/// the index structures borrow them rather than copy them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    id: usize,
    coordinates: Vec<f64>,
}

impl Point {
    /// Creates a point, rejecting empty or non-finite coordinate vectors.
    ///
    /// # Errors
    ///
    /// Returns `KdSearchError::InvalidInput` if `coordinates` is empty or
    /// contains NaN or an infinity.
    pub fn new(id: usize, coordinates: Vec<f64>) -> Result<Self, KdSearchError> {
        if coordinates.is_empty() {
            return Err(KdSearchError::InvalidInput {
                message: format!("point {id} has no coordinates"),
            });
        }
        if let Some(axis) = coordinates.iter().position(|c| !c.is_finite()) {
            return Err(KdSearchError::InvalidInput {
                message: format!("point {id} has a non-finite coordinate on axis {axis}"),
            });
        }
        Ok(Self { id, coordinates })
    }

    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.coordinates.len()
    }

    /// Coordinate on `axis`, or `None` past the last axis.
    #[must_use]
    pub fn coordinate(&self, axis: usize) -> Option<f64> {
        self.coordinates.get(axis).copied()
    }

    #[must_use]
    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_accessors() {
        let p = Point::new(7, vec![1.5, -2.0, 3.25]).unwrap();
        assert_eq!(p.id(), 7);
        assert_eq!(p.dimension(), 3);
        assert_eq!(p.coordinate(1), Some(-2.0));
        assert_eq!(p.coordinate(3), None);
        assert_eq!(p.coordinates(), &[1.5, -2.0, 3.25]);
    }

    #[test]
    fn test_point_rejects_empty_coordinates() {
        let result = Point::new(0, Vec::new());
        assert!(matches!(result, Err(KdSearchError::InvalidInput { .. })));
    }

    #[test]
    fn test_point_rejects_non_finite_coordinates() {
        assert!(Point::new(1, vec![0.0, f64::NAN]).is_err());
        assert!(Point::new(1, vec![f64::INFINITY]).is_err());
        assert!(Point::new(1, vec![f64::MAX, f64::MIN]).is_ok());
    }
}
