// src/core/retrieval/features.rs

//! Pre-extracted image features on disk.
//!
//! Each image's features live in `<directory><prefix><index>.feats` as a JSON
//! array of coordinate arrays, one inner array per feature.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::core::common::KdSearchError;
use crate::core::config::RetrievalConfig;
use crate::core::types::Point;

/// Reads a features file, tagging every feature with `id`.
///
/// # Errors
/// * `KdSearchError::Io` if the file cannot be opened.
/// * `KdSearchError::Json` if it is not an array of number arrays.
/// * `KdSearchError::InvalidInput` if a feature is not `dimension` long or has
///   a non-finite coordinate.
pub fn read_features(path: &Path, id: usize, dimension: usize) -> Result<Vec<Point>, KdSearchError> {
    let reader = BufReader::new(File::open(path)?);
    let rows: Vec<Vec<f64>> = serde_json::from_reader(reader)?;

    let mut points = Vec::with_capacity(rows.len());
    for (row, coordinates) in rows.into_iter().enumerate() {
        if coordinates.len() != dimension {
            return Err(KdSearchError::invalid_input(format!(
                "feature {row} in '{}' has dimension {}, expected {dimension}",
                path.display(),
                coordinates.len()
            )));
        }
        points.push(Point::new(id, coordinates)?);
    }
    if points.is_empty() {
        warn!(path = %path.display(), "features file is empty");
    }
    Ok(points)
}

/// Writes `points` in the format [`read_features`] reads. Identifiers are not
/// stored; they come from the file name.
///
/// # Errors
/// `KdSearchError::Io` or `KdSearchError::Json` if writing fails.
pub fn write_features(path: &Path, points: &[Point]) -> Result<(), KdSearchError> {
    let rows: Vec<&[f64]> = points.iter().map(Point::coordinates).collect();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &rows)?;
    writer.flush()?;
    Ok(())
}

/// Loads the features of gallery image `index`.
///
/// # Errors
/// `KdSearchError::Configuration` for an index out of range, otherwise as
/// [`read_features`] with the configured PCA dimension.
pub fn load_image_features(config: &RetrievalConfig, index: usize) -> Result<Vec<Point>, KdSearchError> {
    let path = config.features_path(index)?;
    read_features(&path, index, config.pca_dimension)
}

/// Loads the features of every gallery image into one point set.
///
/// # Errors
/// The first error from [`load_image_features`].
pub fn load_gallery(config: &RetrievalConfig) -> Result<Vec<Point>, KdSearchError> {
    let mut gallery = Vec::new();
    for index in 0..config.num_of_images {
        gallery.extend(load_image_features(config, index)?);
    }
    debug!(images = config.num_of_images, features = gallery.len(), "loaded gallery features");
    Ok(gallery)
}
