//! Boundary to the external minutiae extraction stage.
//!
//! Enhancement, ridge thinning and termination/bifurcation detection live
//! outside this crate. Implement [`MinutiaeExtractor`] to plug one in; any
//! closure with the right signature already does.

use crate::image::ImageView;
use crate::minutiae::MinutiaeSet;
use thiserror::Error;

/// Reasons an extractor could not produce minutiae.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// The image could not be decoded or has an unsupported layout.
    #[error("unreadable image: {reason}")]
    UnreadableImage { reason: String },
    /// Ridge enhancement failed.
    #[error("enhancement failed: {reason}")]
    EnhancementFailed { reason: String },
    /// The image holds no usable ridge structure.
    #[error("no ridge structure found")]
    NoRidgeStructure,
}

/// Produces typed minutiae from a preprocessed grayscale image.
pub trait MinutiaeExtractor {
    fn extract(&self, image: ImageView<'_, u8>) -> Result<MinutiaeSet, ExtractionError>;
}

impl<F> MinutiaeExtractor for F
where
    F: Fn(ImageView<'_, u8>) -> Result<MinutiaeSet, ExtractionError>,
{
    fn extract(&self, image: ImageView<'_, u8>) -> Result<MinutiaeSet, ExtractionError> {
        self(image)
    }
}
