/*!
 * Error types for the smisub application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Structural errors that make a file unreadable as SAMI
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SamiError {
    /// The document does not start with the `<SAMI>` header
    #[error("Missing <SAMI> header (found: {found:?})")]
    MissingHeader {
        /// First non-blank line of the input, if any
        found: Option<String>,
    },

    /// The `<BODY>` marker never appears
    #[error("Missing <BODY> marker")]
    MissingBody,

    /// A `<SYNC>` tag carries no usable start time
    #[error("Invalid cue timestamp at line {line}: {value:?}")]
    InvalidTimestamp {
        /// 1-based physical line number of the cue tag
        line: usize,
        /// Offending attribute value
        value: String,
    },
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The input is not a SAMI document this parser can recover
    #[error("SAMI format error: {0}")]
    Format(#[from] SamiError),

    /// Configured encoding label is unknown
    #[error("Unknown character encoding: {0}")]
    UnknownEncoding(String),

    /// Reading or writing the subtitle file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SubtitleError {
    /// True when the failure means "this file is not SAMI" rather than an I/O problem
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<SamiError> for AppError {
    fn from(error: SamiError) -> Self {
        Self::Subtitle(SubtitleError::Format(error))
    }
}
