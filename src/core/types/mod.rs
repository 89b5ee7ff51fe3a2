// src/core/types/mod.rs

//! Plain data carried between the feature pipeline and the index.

mod point;

pub use point::Point;
