//! Error types for table-of-contents configuration

use thiserror::Error;

/// Errors that can occur when loading, saving or validating a [`TocConfig`](crate::TocConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error when reading or writing the configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing TOML
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Error serializing to TOML
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Heading level range is empty or outside h1..h6
    #[error("Heading levels must satisfy 1 <= min_level <= max_level <= 6, got {min}..={max}")]
    InvalidLevels {
        /// Configured lowest level
        min: u8,
        /// Configured highest level
        max: u8,
    },

    /// A viewport ratio is outside (0, 1]
    #[error("{field} must be within (0, 1], got {value}")]
    InvalidRatio {
        /// Name of the offending field
        field: &'static str,
        /// The configured value
        value: f64,
    },

    /// Header offset is negative or not a number
    #[error("header_offset_px must be a finite, non-negative number, got {0}")]
    InvalidOffset(f64),

    /// A selector or class name is empty
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// An observer threshold is outside [0, 1]
    #[error("observer thresholds must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
}
