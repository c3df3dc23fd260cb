//! Loading fingerprint images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::OwnedImage;
use crate::util::{FingerMatchError, FingerMatchResult};
use std::path::Path;

/// Copies a grayscale image buffer into an owned image.
pub fn owned_from_gray_image(img: &image::GrayImage) -> FingerMatchResult<OwnedImage> {
    OwnedImage::new(img.as_raw().clone(), img.width() as usize, img.height() as usize)
}

/// Loads an image from disk and converts it to grayscale.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> FingerMatchResult<OwnedImage> {
    let img = image::open(path).map_err(|err| FingerMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_gray_image(&img.to_luma8())
}
