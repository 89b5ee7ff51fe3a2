// src/core/logging.rs

//! Installs the global `tracing` subscriber described by a configuration.

use std::fs::File;
use std::sync::Mutex;

use tracing::Level;

use crate::core::common::KdSearchError;
use crate::core::config::RetrievalConfig;

/// Log target meaning "write to standard output".
pub const STDOUT_TARGET: &str = "stdout";

/// Maps the configured logger level (1 = error .. 4 = debug) to a `tracing` level.
#[must_use]
pub const fn level_for(logger_level: u8) -> Option<Level> {
    match logger_level {
        1 => Some(Level::ERROR),
        2 => Some(Level::WARN),
        3 => Some(Level::INFO),
        4 => Some(Level::DEBUG),
        _ => None,
    }
}

/// Sends log events at or above the configured level to stdout or to the
/// configured file, which is created or truncated. File output has no ANSI
/// colours.
///
/// # Errors
/// * `KdSearchError::InvalidInput` for a logger level outside 1..=4.
/// * `KdSearchError::Io` if the log file cannot be created.
/// * `KdSearchError::Logging` if a global subscriber is already installed.
pub fn init_logging(config: &RetrievalConfig) -> Result<(), KdSearchError> {
    let level = level_for(config.logger_level).ok_or_else(|| {
        KdSearchError::invalid_input(format!("logger level {} is not in 1..=4", config.logger_level))
    })?;
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(false);

    let installed = if config.logger_filename == STDOUT_TARGET {
        builder.try_init()
    } else {
        let file = File::create(&config.logger_filename)?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
    };
    installed.map_err(|e| KdSearchError::Logging(e.to_string()))
}
