// src/core/common/error.rs

use std::fmt;

use crate::core::config::ConfigError;
use crate::core::indexing::vector::kdtree::KdTreeError;

/// Crate-wide error type. Subsystem errors are wrapped so callers can match on
/// the stage that failed.
#[derive(Debug)]
pub enum KdSearchError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Configuration(ConfigError),
    KdTree(KdTreeError),
    InvalidInput { message: String },
    VectorDimensionMismatch { dim1: usize, dim2: usize },
    /// The global log subscriber could not be installed.
    Logging(String),
}

impl fmt::Display for KdSearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO Error: {e}"),
            Self::Json(e) => write!(f, "JSON Deserialization Error: {e}"),
            Self::Configuration(e) => write!(f, "Configuration error:\n{e}"),
            Self::KdTree(e) => write!(f, "{e}"),
            Self::InvalidInput { message } => write!(f, "Invalid input: {message}"),
            Self::VectorDimensionMismatch { dim1, dim2 } => {
                write!(f, "Vector dimension mismatch: dim1 = {dim1}, dim2 = {dim2}")
            }
            Self::Logging(s) => write!(f, "Logging Error: {s}"),
        }
    }
}

impl std::error::Error for KdSearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Configuration(e) => Some(e),
            Self::KdTree(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for KdSearchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for KdSearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<ConfigError> for KdSearchError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err)
    }
}

impl From<KdTreeError> for KdSearchError {
    fn from(err: KdTreeError) -> Self {
        Self::KdTree(err)
    }
}

impl KdSearchError {
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }
}
