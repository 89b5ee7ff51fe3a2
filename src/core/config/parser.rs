// src/core/config/parser.rs

//! Reader for the line-oriented configuration format:
//!
//! ```text
//! # gallery
//! spImagesDirectory = ./images/
//! spImagesPrefix = img
//! spImagesSuffix = .png
//! spNumOfImages = 17
//! spKDTreeSplitMethod = INCREMENTAL
//! ```
//!
//! Keys and values are single tokens; blank lines and `#` comments are
//! skipped. Reading stops at the first bad line.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::error::{ConfigError, Location};
use super::{RetrievalConfig, RetrievalConfigBuilder, SUPPORTED_IMAGE_SUFFIXES};
use crate::core::indexing::vector::kdtree::SplitPolicy;

#[allow(clippy::expect_used)]
fn skip_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*(?:#.*)?$").expect("valid skip pattern"))
}

#[allow(clippy::expect_used)]
fn entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*([^\s=#]+)\s*=\s*([^\s=]+)\s*$").expect("valid entry pattern"))
}

/// Reads and parses a `key = value` configuration file.
///
/// # Errors
/// `InvalidArgument` for an empty path, `CannotOpenFile` if it cannot be read,
/// and any error from [`parse_str`] located in this file.
pub fn parse_file(path: &Path) -> Result<RetrievalConfig, ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::InvalidArgument("configuration path is empty".to_string()));
    }
    let contents = fs::read_to_string(path)
        .map_err(|source| ConfigError::CannotOpenFile { path: path.to_path_buf(), source })?;
    parse_str(&contents, &path.display().to_string())
}

/// Parses configuration text. `file` only names the source in error locations.
///
/// # Errors
/// * `InvalidLine` for a malformed line or an unknown key.
/// * `InvalidInteger` / `InvalidString` for a value that breaks its constraint.
/// * `MissingDir`, `MissingPrefix`, `MissingSuffix`, `MissingNumImages` for the
///   first required key never set, located at the last line.
pub fn parse_str(contents: &str, file: &str) -> Result<RetrievalConfig, ConfigError> {
    let mut builder = RetrievalConfigBuilder::new();
    let mut last_line = 0;

    for (index, line) in contents.lines().enumerate() {
        last_line = index + 1;
        if skip_pattern().is_match(line) {
            continue;
        }
        let location = Location::new(file, last_line);
        let Some(captures) = entry_pattern().captures(line) else {
            return Err(ConfigError::InvalidLine { location });
        };
        apply_entry(&mut builder, &captures[1], &captures[2], location)?;
    }

    builder.check_required(Some(Location::new(file, last_line)))?;
    let config = builder.build()?;
    debug!(file, lines = last_line, "parsed configuration");
    Ok(config)
}

fn apply_entry(
    builder: &mut RetrievalConfigBuilder,
    key: &str,
    value: &str,
    location: Location,
) -> Result<(), ConfigError> {
    match key {
        "spImagesDirectory" => builder.images_directory = Some(value.to_string()),
        "spImagesPrefix" => builder.images_prefix = Some(value.to_string()),
        "spImagesSuffix" => {
            if !SUPPORTED_IMAGE_SUFFIXES.contains(&value) {
                return Err(invalid_string(key, location));
            }
            builder.images_suffix = Some(value.to_string());
        }
        "spNumOfImages" => builder.num_of_images = Some(integer(key, value, 1..=usize::MAX, location)?),
        "spPCADimension" => builder.pca_dimension = Some(integer(key, value, 10..=28, location)?),
        "spPCAFilename" => builder.pca_filename = Some(value.to_string()),
        "spNumOfFeatures" => builder.num_of_features = Some(integer(key, value, 1..=usize::MAX, location)?),
        "spExtractionMode" => builder.extraction_mode = Some(boolean(key, value, location)?),
        "spNumOfSimilarImages" => {
            builder.num_of_similar_images = Some(integer(key, value, 1..=usize::MAX, location)?);
        }
        "spKDTreeSplitMethod" => {
            let policy = SplitPolicy::from_str(value).map_err(|_| invalid_string(key, location))?;
            builder.split_method = Some(policy);
        }
        "spKNN" => builder.knn = Some(integer(key, value, 1..=usize::MAX, location)?),
        "spMinimalGUI" => builder.minimal_gui = Some(boolean(key, value, location)?),
        "spLoggerLevel" => builder.logger_level = Some(integer(key, value, 1..=4, location)?),
        "spLoggerFilename" => builder.logger_filename = Some(value.to_string()),
        "spSplitSeed" => builder.split_seed = Some(integer(key, value, 0..=u64::MAX, location)?),
        _ => return Err(ConfigError::InvalidLine { location }),
    }
    Ok(())
}

fn integer<T>(key: &str, value: &str, range: RangeInclusive<T>, location: Location) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd,
{
    match value.parse::<T>() {
        Ok(n) if range.contains(&n) => Ok(n),
        _ => Err(ConfigError::InvalidInteger { key: key.to_string(), location: Some(location) }),
    }
}

fn boolean(key: &str, value: &str, location: Location) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid_string(key, location)),
    }
}

fn invalid_string(key: &str, location: Location) -> ConfigError {
    ConfigError::InvalidString { key: key.to_string(), location: Some(location) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const GALLERY: &str = "spImagesDirectory = ./images/\n\
                           spImagesPrefix = img\n\
                           spImagesSuffix = .png\n\
                           spNumOfImages = 17\n";

    fn line_of(err: &ConfigError) -> Option<usize> {
        err.location().map(|l| l.line)
    }

    #[test]
    fn test_parse_minimal() {
        let config = parse_str(GALLERY, "spcbir.config").unwrap();
        assert_eq!(config.images_directory, "./images/");
        assert_eq!(config.images_prefix, "img");
        assert_eq!(config.images_suffix, ".png");
        assert_eq!(config.num_of_images, 17);
        assert_eq!(config.split_method, SplitPolicy::MaxSpread);
    }

    #[test]
    fn test_parse_all_keys_with_comments_and_spacing() {
        let text = format!(
            "# gallery\n\n{GALLERY}   spPCADimension=28\nspPCAFilename = p.yml\n  # tuning\n\
             spNumOfFeatures = 50\nspExtractionMode = false\nspNumOfSimilarImages = 5\n\
             spKDTreeSplitMethod = RANDOM\nspKNN = 7\nspMinimalGUI = true\nspLoggerLevel = 4\n\
             spLoggerFilename = run.log\nspSplitSeed = 99\n"
        );
        let config = parse_str(&text, "full.config").unwrap();
        assert_eq!(config.pca_dimension, 28);
        assert_eq!(config.pca_filename, "p.yml");
        assert_eq!(config.num_of_features, 50);
        assert!(!config.extraction_mode);
        assert_eq!(config.num_of_similar_images, 5);
        assert_eq!(config.split_method, SplitPolicy::Random);
        assert_eq!(config.knn, 7);
        assert!(config.minimal_gui);
        assert_eq!(config.logger_level, 4);
        assert_eq!(config.logger_filename, "run.log");
        assert_eq!(config.split_seed, 99);
    }

    #[test]
    fn test_invalid_lines() {
        for bad in ["spKNN 3", "spKNN = 3 4", "spImagesPrefix = my img", "= 3", "spKNN ="] {
            let text = format!("{GALLERY}{bad}\n");
            let err = parse_str(&text, "bad.config").unwrap_err();
            assert!(matches!(err, ConfigError::InvalidLine { .. }), "{bad:?} gave {err:?}");
            assert_eq!(line_of(&err), Some(5));
        }
    }

    #[test]
    fn test_unknown_key_is_invalid_line() {
        let err = parse_str("spColour = red\n", "c.config").unwrap_err();
        assert_eq!(err.to_string(), "File: c.config\nLine: 1\nMessage: Invalid configuration line");
    }

    #[test]
    fn test_integer_constraints() {
        for bad in ["spPCADimension = 9", "spPCADimension = 29", "spKNN = 0", "spKNN = -2", "spKNN = three",
            "spLoggerLevel = 5", "spNumOfFeatures = 0"]
        {
            let text = format!("{GALLERY}{bad}\n");
            let err = parse_str(&text, "i.config").unwrap_err();
            assert!(matches!(err, ConfigError::InvalidInteger { .. }), "{bad:?} gave {err:?}");
            assert_eq!(err.to_string(), "File: i.config\nLine: 5\nMessage: Invalid value - constraint not met");
        }
    }

    #[test]
    fn test_string_constraints() {
        for bad in ["spImagesSuffix = .tif", "spExtractionMode = yes", "spKDTreeSplitMethod = median",
            "spMinimalGUI = TRUE"]
        {
            let err = parse_str(&format!("{bad}\n"), "s.config").unwrap_err();
            assert!(matches!(err, ConfigError::InvalidString { .. }), "{bad:?} gave {err:?}");
            assert_eq!(line_of(&err), Some(1));
        }
    }

    #[test]
    fn test_missing_required_reported_at_last_line() {
        let err = parse_str("spImagesPrefix = img\n\nspKNN = 2\n", "m.config").unwrap_err();
        assert!(matches!(err, ConfigError::MissingDir { .. }));
        assert_eq!(err.to_string(), "File: m.config\nLine: 3\nMessage: Parameter spImagesDirectory is not set");

        let err = parse_str("spImagesDirectory = d/\nspImagesPrefix = p\nspImagesSuffix = .jpg\n", "m.config")
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingNumImages { .. }));
        assert_eq!(line_of(&err), Some(3));
    }

    #[test]
    fn test_first_error_wins() {
        let text = "spKNN = 0\nspImagesSuffix = .tif\n";
        let err = parse_str(text, "f.config").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInteger { .. }));
        assert_eq!(line_of(&err), Some(1));
    }

    #[test]
    fn test_later_value_overrides_earlier() {
        let text = format!("{GALLERY}spKNN = 2\nspKNN = 6\n");
        assert_eq!(parse_str(&text, "o.config").unwrap().knn, 6);
    }

    #[test]
    fn test_parse_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{GALLERY}spKNN = 3").unwrap();
        let config = parse_file(file.path()).unwrap();
        assert_eq!(config.knn, 3);
    }

    #[test]
    fn test_parse_file_errors() {
        assert!(matches!(parse_file(Path::new("")), Err(ConfigError::InvalidArgument(_))));
        assert!(matches!(
            parse_file(Path::new("/definitely/not/here.config")),
            Err(ConfigError::CannotOpenFile { .. })
        ));
    }
}
