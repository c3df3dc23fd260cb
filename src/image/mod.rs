//! Grayscale fingerprint images handed to the minutiae extractor.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride
//! (elements between row starts). `OwnedImage` owns a contiguous buffer.

use crate::util::{FingerMatchError, FingerMatchResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> FingerMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        stride: usize,
    ) -> FingerMatchResult<Self> {
        if width == 0 || height == 0 || stride < width {
            return Err(FingerMatchError::InvalidDimensions { width, height });
        }
        let needed = (height - 1)
            .checked_mul(stride)
            .and_then(|v| v.checked_add(width))
            .ok_or(FingerMatchError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(FingerMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixel at `(x, y)` if within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x)
    }

    /// Row `y` without padding.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.data.get(start..start + self.width)
    }
}

/// Owned contiguous grayscale image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a contiguous row-major buffer of exactly `width * height` pixels.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> FingerMatchResult<Self> {
        let needed = width
            .checked_mul(height)
            .filter(|&n| n > 0)
            .ok_or(FingerMatchError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(FingerMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageView, OwnedImage};
    use crate::util::FingerMatchError;

    #[test]
    fn view_rejects_bad_shapes() {
        let data = [0u8; 6];
        assert_eq!(
            ImageView::from_slice(&data, 0, 2).unwrap_err(),
            FingerMatchError::InvalidDimensions {
                width: 0,
                height: 2,
            }
        );
        assert_eq!(
            ImageView::new(&data, 3, 3, 3).unwrap_err(),
            FingerMatchError::BufferTooSmall { needed: 9, got: 6 }
        );
    }

    #[test]
    fn strided_rows_skip_padding() {
        let data: Vec<u8> = (0u8..8).collect();
        let view = ImageView::new(&data, 3, 2, 4).unwrap();
        assert_eq!(view.row(1).unwrap(), &[4u8, 5, 6]);
        assert_eq!(view.get(2, 0).copied(), Some(2));
        assert!(view.get(3, 0).is_none());
    }

    #[test]
    fn owned_image_requires_exact_buffer() {
        let img = OwnedImage::new(vec![7u8; 6], 3, 2).unwrap();
        assert_eq!(img.view().row(1).unwrap(), &[7u8; 3]);
        assert!(OwnedImage::new(vec![0u8; 5], 3, 2).is_err());
    }
}
