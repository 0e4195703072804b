#![deny(missing_docs)]
//! Simulation of a camera sensor's Bayer color filter array.
//!
//! A sensor behind a CFA records one color channel per pixel. This
//! crate models that sampling step, reconstructs full RGB images from
//! the sampled grid with three selectable demosaicing algorithms,
//! scores reconstructions with PSNR and SSIM, and persists sampled
//! grids in a small checksummed container format.
//!
//! Everything here is a pure function over owned pixel buffers: no
//! operation keeps state between calls, and independent inputs can be
//! processed concurrently without coordination.
//!
//! # Usage
//! ```
//! use cfaimage::{metrics, BayerPattern, DemosaicMethod, RgbImage};
//!
//! let img = RgbImage::new(vec![128u8; 8 * 6 * 3], 8, 6).unwrap();
//! let cfa = img.mosaic(BayerPattern::Rggb);
//! let rgb = cfa.demosaic(DemosaicMethod::MalvarHeCutler).unwrap();
//! let m = metrics(&img, &rgb);
//! assert!(m.psnr.is_infinite());
//! ```
//!
//! With the `rayon` feature (on by default) the bilinear and
//! gradient-corrected demosaicers interpolate output rows in parallel;
//! without it a serial loop produces identical bytes.

mod container;
mod demosaic;
mod errors;
mod imagedata;
mod metrics;
mod mosaic;
mod pattern;

pub use container::{
    decode, decode_with, encode, encode_with, inspect, ContainerInfo, JpegCodec, MosaicCodec,
    FORMAT_VERSION, HEADER_SIZE, MAGIC,
};
pub use demosaic::DemosaicMethod;
pub use errors::{CfaError, CfaResult, ContainerError, ContainerResult};
pub use imagedata::{CfaImage, RgbImage};
pub use metrics::{metrics, psnr, ssim, Metrics};
pub use pattern::{bayer_masks, BayerPattern, Channel, ColorMasks};
