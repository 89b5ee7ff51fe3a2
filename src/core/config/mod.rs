// src/core/config/mod.rs

//! Retrieval configuration: the settings value, its builder, and loaders for
//! the line-oriented `key = value` format and for TOML.

pub mod error;
mod parser;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::indexing::vector::kdtree::{SplitPolicy, TreeConfig};

pub use error::{ConfigError, Location};
pub use parser::{parse_file, parse_str};

/// Image file suffixes a gallery may use.
pub const SUPPORTED_IMAGE_SUFFIXES: [&str; 4] = [".jpg", ".png", ".bmp", ".gif"];

/// Suffix of pre-extracted feature files.
pub const FEATURES_SUFFIX: &str = ".feats";

const DEFAULT_PCA_DIMENSION: usize = 20;
const DEFAULT_PCA_FILENAME: &str = "pca.yml";
const DEFAULT_NUM_OF_FEATURES: usize = 100;
const DEFAULT_NUM_OF_SIMILAR_IMAGES: usize = 1;
const DEFAULT_KNN: usize = 1;
const DEFAULT_LOGGER_LEVEL: u8 = 3;
const DEFAULT_LOGGER_FILENAME: &str = "stdout";

/// Settings for one retrieval session.
///
/// Built once, by [`RetrievalConfig::load_from_file`] or
/// [`RetrievalConfigBuilder`], and passed by reference afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    pub images_directory: String,
    pub images_prefix: String,
    /// One of [`SUPPORTED_IMAGE_SUFFIXES`].
    pub images_suffix: String,
    pub num_of_images: usize,
    #[serde(default = "default_pca_dimension")]
    pub pca_dimension: usize,
    #[serde(default = "default_pca_filename")]
    pub pca_filename: String,
    #[serde(default = "default_num_of_features")]
    pub num_of_features: usize,
    #[serde(default = "default_true")]
    pub extraction_mode: bool,
    #[serde(default = "default_num_of_similar_images")]
    pub num_of_similar_images: usize,
    #[serde(default)]
    pub split_method: SplitPolicy,
    #[serde(default = "default_knn")]
    pub knn: usize,
    #[serde(default)]
    pub minimal_gui: bool,
    /// 1 = error, 2 = warning, 3 = info, 4 = debug.
    #[serde(default = "default_logger_level")]
    pub logger_level: u8,
    /// `stdout`, or a path to write the log to.
    #[serde(default = "default_logger_filename")]
    pub logger_filename: String,
    #[serde(default)]
    pub split_seed: u64,
}

const fn default_pca_dimension() -> usize {
    DEFAULT_PCA_DIMENSION
}

fn default_pca_filename() -> String {
    DEFAULT_PCA_FILENAME.to_string()
}

const fn default_num_of_features() -> usize {
    DEFAULT_NUM_OF_FEATURES
}

const fn default_true() -> bool {
    true
}

const fn default_num_of_similar_images() -> usize {
    DEFAULT_NUM_OF_SIMILAR_IMAGES
}

const fn default_knn() -> usize {
    DEFAULT_KNN
}

const fn default_logger_level() -> u8 {
    DEFAULT_LOGGER_LEVEL
}

fn default_logger_filename() -> String {
    DEFAULT_LOGGER_FILENAME.to_string()
}

/// Fluent builder for [`RetrievalConfig`].
///
/// The four gallery parameters are required; everything else falls back to
/// its default. `build` applies the same checks as the file loaders.
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    images_directory: Option<String>,
    images_prefix: Option<String>,
    images_suffix: Option<String>,
    num_of_images: Option<usize>,
    pca_dimension: Option<usize>,
    pca_filename: Option<String>,
    num_of_features: Option<usize>,
    extraction_mode: Option<bool>,
    num_of_similar_images: Option<usize>,
    split_method: Option<SplitPolicy>,
    knn: Option<usize>,
    minimal_gui: Option<bool>,
    logger_level: Option<u8>,
    logger_filename: Option<String>,
    split_seed: Option<u64>,
}

impl RetrievalConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn images_directory(mut self, dir: impl Into<String>) -> Self {
        self.images_directory = Some(dir.into());
        self
    }

    #[must_use]
    pub fn images_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.images_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn images_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.images_suffix = Some(suffix.into());
        self
    }

    #[must_use]
    pub fn num_of_images(mut self, count: usize) -> Self {
        self.num_of_images = Some(count);
        self
    }

    #[must_use]
    pub fn pca_dimension(mut self, dimension: usize) -> Self {
        self.pca_dimension = Some(dimension);
        self
    }

    #[must_use]
    pub fn pca_filename(mut self, filename: impl Into<String>) -> Self {
        self.pca_filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn num_of_features(mut self, count: usize) -> Self {
        self.num_of_features = Some(count);
        self
    }

    #[must_use]
    pub fn extraction_mode(mut self, enabled: bool) -> Self {
        self.extraction_mode = Some(enabled);
        self
    }

    #[must_use]
    pub fn num_of_similar_images(mut self, count: usize) -> Self {
        self.num_of_similar_images = Some(count);
        self
    }

    #[must_use]
    pub fn split_method(mut self, policy: SplitPolicy) -> Self {
        self.split_method = Some(policy);
        self
    }

    #[must_use]
    pub fn knn(mut self, k: usize) -> Self {
        self.knn = Some(k);
        self
    }

    #[must_use]
    pub fn minimal_gui(mut self, enabled: bool) -> Self {
        self.minimal_gui = Some(enabled);
        self
    }

    #[must_use]
    pub fn logger_level(mut self, level: u8) -> Self {
        self.logger_level = Some(level);
        self
    }

    #[must_use]
    pub fn logger_filename(mut self, filename: impl Into<String>) -> Self {
        self.logger_filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn split_seed(mut self, seed: u64) -> Self {
        self.split_seed = Some(seed);
        self
    }

    /// First missing required parameter, in directory, prefix, suffix,
    /// image count order.
    fn check_required(&self, location: Option<Location>) -> Result<(), ConfigError> {
        if self.images_directory.is_none() {
            return Err(ConfigError::MissingDir { location });
        }
        if self.images_prefix.is_none() {
            return Err(ConfigError::MissingPrefix { location });
        }
        if self.images_suffix.is_none() {
            return Err(ConfigError::MissingSuffix { location });
        }
        if self.num_of_images.is_none() {
            return Err(ConfigError::MissingNumImages { location });
        }
        Ok(())
    }

    /// # Errors
    /// Returns the `Missing*` error for the first unset required parameter,
    /// or whatever [`RetrievalConfig::validate`] rejects.
    pub fn build(self) -> Result<RetrievalConfig, ConfigError> {
        self.check_required(None)?;
        let config = RetrievalConfig {
            images_directory: self.images_directory.unwrap_or_default(),
            images_prefix: self.images_prefix.unwrap_or_default(),
            images_suffix: self.images_suffix.unwrap_or_default(),
            num_of_images: self.num_of_images.unwrap_or_default(),
            pca_dimension: self.pca_dimension.unwrap_or(DEFAULT_PCA_DIMENSION),
            pca_filename: self.pca_filename.unwrap_or_else(default_pca_filename),
            num_of_features: self.num_of_features.unwrap_or(DEFAULT_NUM_OF_FEATURES),
            extraction_mode: self.extraction_mode.unwrap_or(true),
            num_of_similar_images: self.num_of_similar_images.unwrap_or(DEFAULT_NUM_OF_SIMILAR_IMAGES),
            split_method: self.split_method.unwrap_or_default(),
            knn: self.knn.unwrap_or(DEFAULT_KNN),
            minimal_gui: self.minimal_gui.unwrap_or(false),
            logger_level: self.logger_level.unwrap_or(DEFAULT_LOGGER_LEVEL),
            logger_filename: self.logger_filename.unwrap_or_else(default_logger_filename),
            split_seed: self.split_seed.unwrap_or(0),
        };
        config.validate()?;
        Ok(config)
    }
}

fn invalid_integer(key: &str) -> ConfigError {
    ConfigError::InvalidInteger { key: key.to_string(), location: None }
}

impl RetrievalConfig {
    #[must_use]
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::new()
    }

    /// Checks every parameter against its constraint.
    ///
    /// # Errors
    /// `MissingDir`/`MissingPrefix` for empty gallery names, `InvalidString`
    /// for an unsupported suffix, `InvalidInteger` for an out-of-range number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images_directory.is_empty() {
            return Err(ConfigError::MissingDir { location: None });
        }
        if self.images_prefix.is_empty() {
            return Err(ConfigError::MissingPrefix { location: None });
        }
        if !SUPPORTED_IMAGE_SUFFIXES.contains(&self.images_suffix.as_str()) {
            return Err(ConfigError::InvalidString { key: "spImagesSuffix".to_string(), location: None });
        }
        if self.num_of_images == 0 {
            return Err(invalid_integer("spNumOfImages"));
        }
        if !(10..=28).contains(&self.pca_dimension) {
            return Err(invalid_integer("spPCADimension"));
        }
        if self.num_of_features == 0 {
            return Err(invalid_integer("spNumOfFeatures"));
        }
        if self.num_of_similar_images == 0 {
            return Err(invalid_integer("spNumOfSimilarImages"));
        }
        if self.knn == 0 {
            return Err(invalid_integer("spKNN"));
        }
        if !(1..=4).contains(&self.logger_level) {
            return Err(invalid_integer("spLoggerLevel"));
        }
        Ok(())
    }

    /// Loads a configuration file. Files ending in `.toml` are read as TOML,
    /// anything else as `key = value` lines.
    ///
    /// # Errors
    /// `CannotOpenFile` if the file cannot be read, `Toml` if a TOML file does
    /// not deserialize, and the parser's or [`validate`](Self::validate)'s
    /// errors otherwise.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let is_toml = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if !is_toml {
            return parse_file(path);
        }

        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::CannotOpenFile { path: path.to_path_buf(), source })?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Toml { path: path.to_path_buf(), message: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    fn check_index(&self, index: usize) -> Result<(), ConfigError> {
        if index >= self.num_of_images {
            return Err(ConfigError::IndexOutOfRange { index, num_of_images: self.num_of_images });
        }
        Ok(())
    }

    /// `<directory><prefix><index><suffix>`.
    ///
    /// # Errors
    /// `IndexOutOfRange` if `index >= num_of_images`.
    pub fn image_path(&self, index: usize) -> Result<PathBuf, ConfigError> {
        self.check_index(index)?;
        Ok(PathBuf::from(format!(
            "{}{}{}{}",
            self.images_directory, self.images_prefix, index, self.images_suffix
        )))
    }

    /// `<directory><prefix><index>.feats`.
    ///
    /// # Errors
    /// `IndexOutOfRange` if `index >= num_of_images`.
    pub fn features_path(&self, index: usize) -> Result<PathBuf, ConfigError> {
        self.check_index(index)?;
        Ok(PathBuf::from(format!(
            "{}{}{}{}",
            self.images_directory, self.images_prefix, index, FEATURES_SUFFIX
        )))
    }

    #[must_use]
    pub fn pca_path(&self) -> PathBuf {
        PathBuf::from(format!("{}{}", self.images_directory, self.pca_filename))
    }

    /// Tree build settings for this session.
    #[must_use]
    pub const fn tree_config(&self) -> TreeConfig {
        TreeConfig::new(self.split_method, self.split_seed)
    }
}
