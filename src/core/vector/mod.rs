// src/core/vector/mod.rs

//! Distance utilities shared by the KNN indexes.

pub mod similarity;

pub use similarity::{euclidean_distance, squared_euclidean_distance};
