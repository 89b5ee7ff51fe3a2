// src/core/indexing/vector/kdtree/tests/mod.rs


use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::types::Point;

/// Points with ids `0..coords.len()`.
pub(super) fn points_from(coords: &[&[f64]]) -> Vec<Point> {
    coords.iter().enumerate().map(|(id, c)| Point::new(id, c.to_vec()).unwrap()).collect()
}

/// `n` points uniformly drawn from `[0, 1)^dimension`.
pub(super) fn random_points(n: usize, dimension: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|id| Point::new(id, (0..dimension).map(|_| rng.gen::<f64>()).collect()).unwrap())
        .collect()
}

/// `n` points on a coarse integer grid, so coordinates and distances tie often.
pub(super) fn grid_points(n: usize, dimension: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|id| {
            Point::new(id, (0..dimension).map(|_| f64::from(rng.gen_range(0..4u8))).collect()).unwrap()
        })
        .collect()
}
