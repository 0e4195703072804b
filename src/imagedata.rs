//! Owned pixel containers for RGB images and CFA sample grids.

use crate::errors::{CfaError, CfaResult};
use crate::pattern::{BayerPattern, Channel};

/// An owned, interleaved 8-bit RGB image.
///
/// Pixels are stored row-major from the top-left corner, three bytes
/// per pixel. The buffer length always equals `width * height * 3`;
/// the constructor rejects anything else. Operations never mutate an
/// image in place, they return new buffers.
///
/// # Usage
/// ```
/// use cfaimage::RgbImage;
///
/// let data = vec![0u8; 3 * 2 * 3];
/// let img = RgbImage::new(data, 3, 2).unwrap();
/// assert_eq!(img.width(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pub(crate) data: Vec<u8>,
    pub(crate) width: usize,
    pub(crate) height: usize,
}

impl RgbImage {
    /// Create a new [`RgbImage`] from interleaved RGB bytes.
    ///
    /// # Arguments
    /// - `data`: Interleaved RGB bytes, `width * height * 3` long.
    /// - `width`: The width of the image.
    /// - `height`: The height of the image.
    ///
    /// # Errors
    /// - [`CfaError::EmptyImage`] if `data` is empty or a dimension is zero.
    /// - [`CfaError::InvalidShape`] if the data length does not match.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> CfaResult<Self> {
        if data.is_empty() || width == 0 || height == 0 {
            return Err(CfaError::EmptyImage);
        }
        let expected = width.saturating_mul(height).saturating_mul(3);
        if data.len() != expected {
            return Err(CfaError::InvalidShape {
                expected,
                got: data.len(),
            });
        }
        Ok(RgbImage {
            data,
            width,
            height,
        })
    }

    /// Get the width of the image.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height of the image.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the underlying data as a slice.
    pub fn as_slice(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Consume the image and return the underlying data.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Get the length of the data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the data is empty. Always false for a constructed image.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample value of `channel` at `(row, col)`.
    pub fn at(&self, row: usize, col: usize, channel: Channel) -> u8 {
        self.data[(row * self.width + col) * 3 + channel.index()]
    }
}

/// An owned single-channel CFA sample grid.
///
/// Each position holds the one channel its sensor site sampled; the
/// [`BayerPattern`] stored alongside says which channel that is. The
/// buffer length always equals `width * height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfaImage {
    pub(crate) data: Vec<u8>,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) pattern: BayerPattern,
}

impl CfaImage {
    /// Create a new [`CfaImage`] from raw sample bytes.
    ///
    /// # Arguments
    /// - `data`: Row-major sample bytes, `width * height` long.
    /// - `width`: The width of the grid.
    /// - `height`: The height of the grid.
    /// - `pattern`: The Bayer pattern the grid was sampled under.
    ///
    /// # Errors
    /// - [`CfaError::EmptyImage`] if `data` is empty or a dimension is zero.
    /// - [`CfaError::InvalidShape`] if the data length does not match.
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        pattern: BayerPattern,
    ) -> CfaResult<Self> {
        if data.is_empty() || width == 0 || height == 0 {
            return Err(CfaError::EmptyImage);
        }
        let expected = width.saturating_mul(height);
        if data.len() != expected {
            return Err(CfaError::InvalidShape {
                expected,
                got: data.len(),
            });
        }
        Ok(CfaImage {
            data,
            width,
            height,
            pattern,
        })
    }

    /// Get the width of the grid.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height of the grid.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the Bayer pattern the grid was sampled under.
    pub fn pattern(&self) -> BayerPattern {
        self.pattern
    }

    /// Get the underlying data as a slice.
    pub fn as_slice(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Consume the grid and return the underlying data.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Get the length of the data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the data is empty. Always false for a constructed grid.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample value at `(row, col)`.
    pub fn at(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.width + col]
    }
}
