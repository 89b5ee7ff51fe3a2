// src/core/indexing/vector/kdtree/error.rs

use std::collections::TryReserveError;
use std::fmt;

/// Errors raised while building or searching a KD-Tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KdTreeError {
    /// Malformed or inconsistent point data: non-positive dimension,
    /// points of mixed dimension, non-finite coordinates.
    InvalidInput(String),
    /// Bad query parameters: `k == 0`, query of the wrong dimension,
    /// split axis out of range.
    InvalidArgument(String),
    /// A buffer sized by caller input could not be allocated.
    AllocationFailure(String),
}

impl KdTreeError {
    pub(crate) fn allocation(what: &str, err: &TryReserveError) -> Self {
        Self::AllocationFailure(format!("{what}: {err}"))
    }
}

impl fmt::Display for KdTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "KD-Tree Invalid Input: {msg}"),
            Self::InvalidArgument(msg) => write!(f, "KD-Tree Invalid Argument: {msg}"),
            Self::AllocationFailure(msg) => write!(f, "KD-Tree Allocation Failure: {msg}"),
        }
    }
}

impl std::error::Error for KdTreeError {}

/// Reserves room for exactly `additional` more elements, reporting failure
/// as [`KdTreeError::AllocationFailure`] instead of aborting.
pub(crate) fn try_with_capacity<T>(additional: usize, what: &str) -> Result<Vec<T>, KdTreeError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(additional).map_err(|e| KdTreeError::allocation(what, &e))?;
    Ok(buf)
}
