// src/core/vector/similarity.rs

use crate::core::common::KdSearchError;

/// Calculates the squared Euclidean distance between two vectors.
///
/// # Arguments
///
/// * `v1` - A slice of f64 representing the first vector.
/// * `v2` - A slice of f64 representing the second vector.
///
/// # Errors
///
/// Returns `KdSearchError::VectorDimensionMismatch` if the vectors have
/// different lengths.
pub fn squared_euclidean_distance(v1: &[f64], v2: &[f64]) -> Result<f64, KdSearchError> {
    if v1.len() != v2.len() {
        return Err(KdSearchError::VectorDimensionMismatch { dim1: v1.len(), dim2: v2.len() });
    }
    Ok(squared_distance(v1, v2))
}

/// Calculates the Euclidean distance between two vectors.
///
/// # Errors
///
/// Returns `KdSearchError::VectorDimensionMismatch` if the vectors have
/// different lengths.
pub fn euclidean_distance(v1: &[f64], v2: &[f64]) -> Result<f64, KdSearchError> {
    squared_euclidean_distance(v1, v2).map(f64::sqrt)
}

/// Squared Euclidean distance for callers that already checked the lengths.
#[inline]
pub(crate) fn squared_distance(v1: &[f64], v2: &[f64]) -> f64 {
    debug_assert_eq!(v1.len(), v2.len(), "vector dimension mismatch");
    v1.iter()
        .zip(v2.iter())
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum()
}
