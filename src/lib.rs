#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::cast_possible_wrap)]
#![warn(clippy::cast_sign_loss)]
#![forbid(unsafe_code)]
#![warn(clippy::todo, clippy::module_inception, clippy::wildcard_imports, clippy::correctness, clippy::perf)]
#![warn(clippy::missing_const_for_fn, clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # kdsearch: exact nearest-neighbour search over image features
//!
//! `kdsearch` indexes fixed-dimension feature vectors in a KD-Tree and answers
//! exact K-Nearest Neighbor queries. It features:
//! - A pre-sorted point set that splits at the median in linear time per axis
//! - Three split-axis policies: random, maximum spread, and round-robin
//! - Exact KNN search with a bounded candidate set and hyperplane pruning
//! - A gallery retrieval stage that ranks images by neighbour votes
//! - Configuration from `key = value` files or TOML
//!
//! A tree borrows the points it indexes and is read-only once built, so one
//! tree can serve queries from several threads.

pub mod core;

pub use crate::core::common::KdSearchError;
pub use crate::core::config::{ConfigError, RetrievalConfig, RetrievalConfigBuilder};
pub use crate::core::indexing::vector::kdtree::{
    build_kdtree, find_knn, BoundedPriorityQueue, KdArray, KdNode, KdTree, KdTreeError, Neighbor,
    SplitPolicy, TreeConfig,
};
pub use crate::core::indexing::vector::{linear::LinearScanIndex, KnnIndex};
pub use crate::core::retrieval::{ImageMatch, ImageRetriever};
pub use crate::core::types::Point;

/// Core result type for the library
pub type Result<T> = std::result::Result<T, KdSearchError>;
