// src/core/config/error.rs

use std::fmt;
use std::path::PathBuf;

/// Where in a configuration file a problem was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    /// 1-based line number.
    pub line: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self { file: file.into(), line }
    }
}

/// Errors raised while loading, validating or querying a `RetrievalConfig`.
///
/// Variants raised while reading a key/value file carry a [`Location`] and
/// render as a `File:` / `Line:` / `Message:` block.
#[derive(Debug)]
pub enum ConfigError {
    /// A path argument was empty or otherwise unusable.
    InvalidArgument(String),
    CannotOpenFile { path: PathBuf, source: std::io::Error },
    /// The TOML form of the configuration failed to deserialize.
    Toml { path: PathBuf, message: String },
    /// A line is neither blank, a comment, nor a `key = value` entry for a known key.
    InvalidLine { location: Location },
    /// An integer parameter is not a number or is out of its range.
    InvalidInteger { key: String, location: Option<Location> },
    /// A string, boolean or enumerated parameter has an unsupported value.
    InvalidString { key: String, location: Option<Location> },
    MissingDir { location: Option<Location> },
    MissingPrefix { location: Option<Location> },
    MissingSuffix { location: Option<Location> },
    MissingNumImages { location: Option<Location> },
    /// An image index at or past `num_of_images`.
    IndexOutOfRange { index: usize, num_of_images: usize },
}

impl ConfigError {
    /// The configuration key a missing-parameter error refers to.
    #[must_use]
    pub const fn missing_key(&self) -> Option<&'static str> {
        match self {
            Self::MissingDir { .. } => Some("spImagesDirectory"),
            Self::MissingPrefix { .. } => Some("spImagesPrefix"),
            Self::MissingSuffix { .. } => Some("spImagesSuffix"),
            Self::MissingNumImages { .. } => Some("spNumOfImages"),
            _ => None,
        }
    }

    /// The file position the error was found at, if it came from a file.
    #[must_use]
    pub const fn location(&self) -> Option<&Location> {
        match self {
            Self::InvalidLine { location } => Some(location),
            Self::InvalidInteger { location, .. }
            | Self::InvalidString { location, .. }
            | Self::MissingDir { location }
            | Self::MissingPrefix { location }
            | Self::MissingSuffix { location }
            | Self::MissingNumImages { location } => location.as_ref(),
            _ => None,
        }
    }
}

fn write_located(f: &mut fmt::Formatter<'_>, location: Option<&Location>, message: &str) -> fmt::Result {
    match location {
        Some(Location { file, line }) => write!(f, "File: {file}\nLine: {line}\nMessage: {message}"),
        None => f.write_str(message),
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            Self::CannotOpenFile { path, source } => {
                write!(f, "Cannot open configuration file '{}': {source}", path.display())
            }
            Self::Toml { path, message } => {
                write!(f, "Failed to parse config file '{}': {message}", path.display())
            }
            Self::InvalidLine { location } => write_located(f, Some(location), "Invalid configuration line"),
            Self::InvalidInteger { key, location } | Self::InvalidString { key, location } => match location {
                Some(_) => write_located(f, location.as_ref(), "Invalid value - constraint not met"),
                None => write!(f, "Invalid value for {key} - constraint not met"),
            },
            Self::MissingDir { location }
            | Self::MissingPrefix { location }
            | Self::MissingSuffix { location }
            | Self::MissingNumImages { location } => {
                let key = self.missing_key().unwrap_or_default();
                write_located(f, location.as_ref(), &format!("Parameter {key} is not set"))
            }
            Self::IndexOutOfRange { index, num_of_images } => {
                write!(f, "Image index {index} is out of range for {num_of_images} images")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CannotOpenFile { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_line_message_block() {
        let err = ConfigError::InvalidLine { location: Location::new("spcbir.config", 4) };
        assert_eq!(err.to_string(), "File: spcbir.config\nLine: 4\nMessage: Invalid configuration line");
    }

    #[test]
    fn test_invalid_value_message_block() {
        let err = ConfigError::InvalidInteger {
            key: "spKNN".to_string(),
            location: Some(Location::new("a.config", 9)),
        };
        assert_eq!(err.to_string(), "File: a.config\nLine: 9\nMessage: Invalid value - constraint not met");

        let unlocated = ConfigError::InvalidString { key: "spImagesSuffix".to_string(), location: None };
        assert_eq!(unlocated.to_string(), "Invalid value for spImagesSuffix - constraint not met");
    }

    #[test]
    fn test_missing_parameter_message_block() {
        let err = ConfigError::MissingSuffix { location: Some(Location::new("b.config", 12)) };
        assert_eq!(err.to_string(), "File: b.config\nLine: 12\nMessage: Parameter spImagesSuffix is not set");
        assert_eq!(err.location().map(|l| l.line), Some(12));
        assert_eq!(ConfigError::MissingNumImages { location: None }.missing_key(), Some("spNumOfImages"));
    }
}
