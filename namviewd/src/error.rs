//! Reviewer errors.

use namview_parser::ParserError;
use namview_state::SessionError;

/// Namview reviewer errors.
#[derive(Debug, thiserror::Error)]
pub enum ReviewerError {
    /// Configuration errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Decoding or display errors.
    #[error("Parser error: {0}")]
    ParserError(#[from] ParserError),
    /// Sign session errors.
    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),
    /// Reading the input or writing the review failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Input could not be turned into transaction bytes.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
