//! Error types for fingermatch.

use thiserror::Error;

/// Result alias for fingermatch operations.
pub type Result<T> = std::result::Result<T, FingerMatchError>;

/// Errors that can occur when building, persisting, or configuring matchers.
///
/// Matching itself never fails: degenerate inputs collapse to empty
/// correspondences and unmatched queries to `None`.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FingerMatchError {
    /// A configuration value is out of range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// A point key could not be parsed from its textual form.
    #[error("invalid point key {text:?}: expected \"(x, y)\"")]
    InvalidPointKey { text: String },
    /// A tuple profile has differing ratio and angle counts.
    #[error("profile has {ratios} ratios but {angles} angles")]
    ProfileLengthMismatch { ratios: usize, angles: usize },
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The backing buffer is shorter than the image requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Reading or writing a template database failed.
    #[error("database io error: {reason}")]
    DatabaseIo { reason: String },
    /// A template database document is malformed.
    #[error("database format error: {reason}")]
    DatabaseFormat { reason: String },
    /// Loading an image from disk failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
