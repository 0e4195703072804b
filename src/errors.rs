//! Error types for sampling, demosaicing and the mosaic container.

use thiserror::Error;

/// Result alias for image and demosaicing operations.
pub type CfaResult<T> = std::result::Result<T, CfaError>;

/// Result alias for mosaic container operations.
pub type ContainerResult<T> = std::result::Result<T, ContainerError>;

/// Errors from image construction, sampling and demosaicing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CfaError {
    /// The pixel buffer is empty or a dimension is zero.
    #[error("image data is empty")]
    EmptyImage,
    /// The pixel buffer does not match the stated dimensions.
    #[error("data length {got} does not match image size {expected}")]
    InvalidShape {
        /// Buffer length required by the stated dimensions.
        expected: usize,
        /// Buffer length actually supplied.
        got: usize,
    },
    /// The image is too small to demosaic.
    #[error("image {width}x{height} is smaller than one 2x2 tile")]
    ImageTooSmall {
        /// Image width in pixels.
        width: usize,
        /// Image height in pixels.
        height: usize,
    },
    /// The demosaicing algorithm identifier is not recognized.
    #[error("unknown demosaicing algorithm `{0}`")]
    UnknownAlgorithm(String),
    /// The Bayer pattern name is not recognized.
    #[error("unknown Bayer pattern `{0}`")]
    UnknownPattern(String),
}

/// Errors from encoding or decoding the mosaic container format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// Quality is outside the accepted range.
    #[error("quality {0} is out of range, expected 1..=100")]
    InvalidQuality(u8),
    /// A dimension does not fit the 16-bit header field.
    #[error("image {width}x{height} exceeds 65535 pixels on an axis")]
    DimensionTooLarge {
        /// Image width in pixels.
        width: usize,
        /// Image height in pixels.
        height: usize,
    },
    /// The buffer is shorter than a container header.
    #[error("buffer of {0} bytes is shorter than the 20 byte header")]
    TooSmall(usize),
    /// The magic number does not match.
    #[error("bad magic {0:02x?}")]
    BadMagic([u8; 4]),
    /// The container version is not supported.
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u8),
    /// The buffer ends before the declared payload does.
    #[error("payload truncated, declared {declared} bytes with {available} available")]
    Truncated {
        /// Payload length declared in the header.
        declared: usize,
        /// Payload bytes actually present.
        available: usize,
    },
    /// The payload does not match the stored checksum.
    #[error("checksum mismatch, stored {stored:#010x} but computed {computed:#010x}")]
    ChecksumMismatch {
        /// CRC-32 stored in the header.
        stored: u32,
        /// CRC-32 recomputed over the payload.
        computed: u32,
    },
    /// The payload codec failed to compress or decompress.
    #[error("codec failure: {0}")]
    Codec(String),
    /// The decoded pixels could not form a valid image.
    #[error(transparent)]
    Image(#[from] CfaError),
}
