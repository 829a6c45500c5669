//! Error types for parameter, state and preset operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised on the control path (never by the audio path).
#[derive(Debug, Error)]
pub enum ParamError {
    /// No parameter with this string id
    #[error("unknown parameter: {0}")]
    UnknownParam(String),

    /// Value text could not be interpreted for the parameter
    #[error("invalid value '{value}' for parameter '{param}': {reason}")]
    InvalidValue {
        /// String id of the parameter.
        param: String,
        /// The offending value text.
        value: String,
        /// What was expected instead.
        reason: String,
    },

    /// Band count outside 1..=3
    #[error("invalid band count {0} (expected 1, 2 or 3)")]
    InvalidBandCount(usize),

    /// State blob is not valid JSON
    #[error("failed to parse state: {0}")]
    StateParse(#[from] serde_json::Error),

    /// State blob is valid JSON but not a parameter map
    #[error("malformed state: {0}")]
    StateFormat(String),

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ParamError {
    /// Create an invalid value error.
    pub fn invalid_value(
        param: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ParamError::InvalidValue {
            param: param.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ParamError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ParamError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ParamError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
