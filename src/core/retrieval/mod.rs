// src/core/retrieval/mod.rs

//! Ranks gallery images by how many of a query image's feature neighbours
//! they own.
//!
//! Every gallery feature is tagged with the index of its image. For each query
//! feature the `knn` nearest gallery features are found, each one casting a
//! vote for its image, and the images with the most votes win.

pub mod features;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::common::KdSearchError;
use crate::core::config::RetrievalConfig;
use crate::core::indexing::vector::kdtree::KdTree;
use crate::core::types::Point;

pub use features::{load_gallery, load_image_features, read_features, write_features};

/// A ranked gallery image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMatch {
    pub image_index: usize,
    /// Query-feature neighbours that belong to this image.
    pub hits: usize,
}

/// A KD-Tree over a gallery plus the ranking settings of one session.
#[derive(Debug)]
pub struct ImageRetriever<'a> {
    tree: KdTree<'a>,
    knn: usize,
    num_of_similar_images: usize,
}

impl<'a> ImageRetriever<'a> {
    /// Indexes `gallery` with the configured split method and seed.
    ///
    /// # Errors
    /// `KdSearchError::KdTree` if a gallery feature does not have
    /// `config.pca_dimension` coordinates or the tree cannot be allocated.
    pub fn new(gallery: &'a [Point], config: &RetrievalConfig) -> Result<Self, KdSearchError> {
        if gallery.is_empty() {
            warn!("gallery has no features; every ranking will be empty");
        }
        let tree_config = config.tree_config();
        let tree = KdTree::build(gallery, config.pca_dimension, &tree_config)?;
        info!(
            features = gallery.len(),
            policy = %tree_config.policy,
            knn = config.knn,
            similar = config.num_of_similar_images,
            "retrieval session ready"
        );
        Ok(Self { tree, knn: config.knn, num_of_similar_images: config.num_of_similar_images })
    }

    #[must_use]
    pub const fn tree(&self) -> &KdTree<'a> {
        &self.tree
    }

    /// Ranks gallery images for one query image's features.
    ///
    /// Results are ordered by hits, most first, ties going to the lower image
    /// index, and hold at most `num_of_similar_images` entries. Images with no
    /// hits are never listed.
    ///
    /// # Errors
    /// `KdSearchError::KdTree` if a query feature has the wrong dimension.
    pub fn rank(&self, query_features: &[Point]) -> Result<Vec<ImageMatch>, KdSearchError> {
        let mut hits: BTreeMap<usize, usize> = BTreeMap::new();
        for feature in query_features {
            for neighbor in self.tree.search_knn(feature.coordinates(), self.knn)? {
                *hits.entry(neighbor.id).or_insert(0) += 1;
            }
        }

        let mut ranking: Vec<ImageMatch> =
            hits.into_iter().map(|(image_index, hits)| ImageMatch { image_index, hits }).collect();
        ranking.sort_by(|a, b| b.hits.cmp(&a.hits).then_with(|| a.image_index.cmp(&b.image_index)));
        ranking.truncate(self.num_of_similar_images);

        debug!(query_features = query_features.len(), matches = ranking.len(), "ranked gallery images");
        Ok(ranking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::indexing::vector::kdtree::{KdTreeError, SplitPolicy};

    const DIM: usize = 10;

    fn at(id: usize, value: f64) -> Point {
        Point::new(id, vec![value; DIM]).unwrap()
    }

    fn config(knn: usize, similar: usize, policy: SplitPolicy) -> RetrievalConfig {
        RetrievalConfig::builder()
            .images_directory("./gallery/")
            .images_prefix("img")
            .images_suffix(".png")
            .num_of_images(3)
            .pca_dimension(DIM)
            .knn(knn)
            .num_of_similar_images(similar)
            .split_method(policy)
            .build()
            .unwrap()
    }

    /// Image 0 clusters near 0, image 1 near 10, image 2 near 20.
    fn gallery() -> Vec<Point> {
        let mut points = Vec::new();
        for (image, centre) in [(0usize, 0.0), (1, 10.0), (2, 20.0)] {
            for offset in [-0.2, -0.1, 0.1, 0.2] {
                points.push(at(image, centre + offset));
            }
        }
        points
    }

    #[test]
    fn test_rank_prefers_closest_image() {
        let gallery = gallery();
        for policy in [SplitPolicy::Random, SplitPolicy::MaxSpread, SplitPolicy::Incremental] {
            let retriever = ImageRetriever::new(&gallery, &config(3, 2, policy)).unwrap();
            let query = vec![at(99, 9.9), at(99, 10.05), at(99, 11.0)];
            let ranking = retriever.rank(&query).unwrap();
            assert_eq!(ranking[0], ImageMatch { image_index: 1, hits: 9 });
            assert_eq!(ranking.len(), 1);
        }
    }

    #[test]
    fn test_rank_orders_by_hits_then_index() {
        let gallery = gallery();
        let retriever = ImageRetriever::new(&gallery, &config(4, 3, SplitPolicy::MaxSpread)).unwrap();
        // Two features vote for image 2, one for image 0, one for image 1.
        let query = vec![at(0, 20.0), at(0, 19.0), at(0, 0.0), at(0, 10.0)];
        let ranking = retriever.rank(&query).unwrap();
        assert_eq!(
            ranking,
            vec![
                ImageMatch { image_index: 2, hits: 8 },
                ImageMatch { image_index: 0, hits: 4 },
                ImageMatch { image_index: 1, hits: 4 },
            ]
        );
    }

    #[test]
    fn test_rank_truncates_to_similar_images() {
        let gallery = gallery();
        let retriever = ImageRetriever::new(&gallery, &config(12, 2, SplitPolicy::Incremental)).unwrap();
        let ranking = retriever.rank(&[at(0, 10.0)]).unwrap();
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].image_index, 0);
        assert!(ranking.iter().all(|m| m.hits == 4));
    }

    #[test]
    fn test_empty_query_and_empty_gallery() {
        let gallery = gallery();
        let retriever = ImageRetriever::new(&gallery, &config(1, 1, SplitPolicy::MaxSpread)).unwrap();
        assert!(retriever.rank(&[]).unwrap().is_empty());

        let empty = ImageRetriever::new(&[], &config(1, 1, SplitPolicy::MaxSpread)).unwrap();
        assert!(empty.tree().is_empty());
        assert!(empty.rank(&[at(0, 1.0)]).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_query_dimension() {
        let gallery = gallery();
        let retriever = ImageRetriever::new(&gallery, &config(1, 1, SplitPolicy::MaxSpread)).unwrap();
        let bad = Point::new(0, vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            retriever.rank(&[bad]),
            Err(KdSearchError::KdTree(KdTreeError::InvalidArgument(_)))
        ));
    }

    #[test]
    fn test_gallery_dimension_must_match_config() {
        let gallery = vec![Point::new(0, vec![1.0, 2.0]).unwrap()];
        assert!(matches!(
            ImageRetriever::new(&gallery, &config(1, 1, SplitPolicy::MaxSpread)),
            Err(KdSearchError::KdTree(KdTreeError::InvalidInput(_)))
        ));
    }
}
