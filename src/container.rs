//! The MOSA container: a checksummed envelope for compressed CFA data.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//!   0x00  magic        4 bytes  "MOSA"
//!   0x04  version      1 byte   currently 1
//!   0x05  pattern id   1 byte   0=RGGB 1=BGGR 2=GRBG 3=GBRG
//!   0x06  width        2 bytes
//!   0x08  height       2 bytes
//!   0x0A  quality      1 byte
//!   0x0B  reserved     1 byte   written as 0
//!   0x0C  payload len  4 bytes
//!   0x10  crc32        4 bytes  over the payload only
//!   0x14  payload
//! ```
//!
//! The checksum covers the payload bytes and nothing else, and decode
//! verifies it before the payload codec ever runs.

use std::io::Cursor;

use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use image::{ExtendedColorType, ImageDecoder};
use serde::Serialize;

use crate::errors::{ContainerError, ContainerResult};
use crate::imagedata::CfaImage;
use crate::pattern::BayerPattern;

/// Magic number opening every container.
pub const MAGIC: [u8; 4] = *b"MOSA";
/// Container format version written by [`encode`].
pub const FORMAT_VERSION: u8 = 1;
/// Fixed header size in bytes.
pub const HEADER_SIZE: usize = 20;

const MAX_DIMENSION: usize = u16::MAX as usize;

/// A lossy single-channel still-image codec carrying the payload.
///
/// The container's integrity guarantees depend only on the codec
/// returning the bytes it was given, byte for byte, through a
/// compress/decompress round trip; the header and checksum never look
/// inside the payload.
pub trait MosaicCodec {
    /// Compress a `width` by `height` 8-bit grayscale grid.
    ///
    /// # Errors
    /// [`ContainerError::Codec`] when the grid cannot be compressed.
    fn compress(
        &self,
        data: &[u8],
        width: usize,
        height: usize,
        quality: u8,
    ) -> ContainerResult<Vec<u8>>;

    /// Decompress back to an 8-bit grayscale grid, returning the
    /// pixels with their width and height.
    ///
    /// # Errors
    /// [`ContainerError::Codec`] when the bytes are not a valid
    /// compressed grid.
    fn decompress(&self, bytes: &[u8]) -> ContainerResult<(Vec<u8>, usize, usize)>;
}

/// The default payload codec: baseline JPEG in 8-bit luma.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegCodec;

impl MosaicCodec for JpegCodec {
    fn compress(
        &self,
        data: &[u8],
        width: usize,
        height: usize,
        quality: u8,
    ) -> ContainerResult<Vec<u8>> {
        let mut out = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
        encoder
            .encode(data, width as u32, height as u32, ExtendedColorType::L8)
            .map_err(|e| ContainerError::Codec(e.to_string()))?;
        Ok(out)
    }

    fn decompress(&self, bytes: &[u8]) -> ContainerResult<(Vec<u8>, usize, usize)> {
        let decoder =
            JpegDecoder::new(Cursor::new(bytes)).map_err(|e| ContainerError::Codec(e.to_string()))?;
        if decoder.color_type() != image::ColorType::L8 {
            return Err(ContainerError::Codec(format!(
                "expected an 8-bit grayscale payload, got {:?}",
                decoder.color_type()
            )));
        }
        let (width, height) = decoder.dimensions();
        let mut data = vec![0u8; decoder.total_bytes() as usize];
        decoder
            .read_image(&mut data)
            .map_err(|e| ContainerError::Codec(e.to_string()))?;
        Ok((data, width as usize, height as usize))
    }
}

/// Parsed header metadata of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    /// Container format version.
    pub version: u8,
    /// Bayer pattern recorded for the payload. An unknown wire id
    /// falls back to RGGB.
    pub pattern: BayerPattern,
    /// Grid width in pixels.
    pub width: usize,
    /// Grid height in pixels.
    pub height: usize,
    /// Codec quality the payload was produced with.
    pub quality: u8,
    /// Payload size in bytes.
    pub payload_len: usize,
}

struct Header {
    info: ContainerInfo,
    crc: u32,
}

/// Encode a CFA grid into a container with the default JPEG codec.
///
/// See [`encode_with`] for the validation steps and error cases.
pub fn encode(cfa: &CfaImage, quality: u8) -> ContainerResult<Vec<u8>> {
    encode_with(cfa, quality, &JpegCodec)
}

/// Encode a CFA grid into a container with a caller-supplied codec.
///
/// The grid is compressed at `quality`, a CRC-32 is computed over the
/// compressed payload, and the result is the 20 byte header followed
/// by the payload.
///
/// # Errors
/// - [`ContainerError::InvalidQuality`] if `quality` is not in 1..=100.
/// - [`ContainerError::DimensionTooLarge`] if a dimension exceeds 65535.
/// - [`ContainerError::Codec`] if compression fails or the payload
///   cannot be sized.
pub fn encode_with<C: MosaicCodec>(
    cfa: &CfaImage,
    quality: u8,
    codec: &C,
) -> ContainerResult<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(ContainerError::InvalidQuality(quality));
    }
    let (width, height) = (cfa.width(), cfa.height());
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ContainerError::DimensionTooLarge { width, height });
    }
    let payload = codec.compress(cfa.as_slice(), width, height, quality)?;
    let payload_len = u32::try_from(payload.len())
        .map_err(|_| ContainerError::Codec("payload exceeds 4 GiB".to_string()))?;
    let crc = crc32fast::hash(&payload);

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&MAGIC);
    out.push(FORMAT_VERSION);
    out.push(cfa.pattern().id());
    out.extend_from_slice(&(width as u16).to_le_bytes());
    out.extend_from_slice(&(height as u16).to_le_bytes());
    out.push(quality);
    out.push(0);
    out.extend_from_slice(&payload_len.to_le_bytes());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode a container back into its CFA grid with the default JPEG
/// codec.
///
/// See [`decode_with`] for the fault ordering and error cases.
pub fn decode(bytes: &[u8]) -> ContainerResult<(CfaImage, ContainerInfo)> {
    decode_with(bytes, &JpegCodec)
}

/// Decode a container back into its CFA grid with a caller-supplied
/// codec.
///
/// Faults are reported in a fixed order: buffer shorter than a header,
/// then magic, version, payload truncation, checksum, and only then
/// codec failures. The checksum is verified strictly before the codec
/// runs, so corrupted bytes never reach the decompressor. Bytes after
/// the declared payload are ignored.
///
/// # Errors
/// - [`ContainerError::TooSmall`], [`ContainerError::BadMagic`],
///   [`ContainerError::UnsupportedVersion`] or
///   [`ContainerError::Truncated`] if the header is unusable.
/// - [`ContainerError::ChecksumMismatch`] if the payload does not hash
///   to the stored CRC-32.
/// - [`ContainerError::Codec`] if decompression fails or produces
///   dimensions other than the header's.
pub fn decode_with<C: MosaicCodec>(
    bytes: &[u8],
    codec: &C,
) -> ContainerResult<(CfaImage, ContainerInfo)> {
    let header = parse_header(bytes)?;
    let info = header.info;
    let payload = &bytes[HEADER_SIZE..HEADER_SIZE + info.payload_len];
    let computed = crc32fast::hash(payload);
    if computed != header.crc {
        return Err(ContainerError::ChecksumMismatch {
            stored: header.crc,
            computed,
        });
    }
    let (data, width, height) = codec.decompress(payload)?;
    if width != info.width || height != info.height {
        return Err(ContainerError::Codec(format!(
            "payload dimensions {width}x{height} disagree with header {}x{}",
            info.width, info.height
        )));
    }
    let cfa = CfaImage::new(data, width, height, info.pattern)?;
    Ok((cfa, info))
}

/// Read container metadata without touching the payload.
///
/// Runs the same header validation as [`decode`] but never verifies
/// the checksum and never decompresses anything, so it stays cheap and
/// works even when the payload bytes are damaged.
///
/// # Errors
/// [`ContainerError::TooSmall`], [`ContainerError::BadMagic`],
/// [`ContainerError::UnsupportedVersion`] or
/// [`ContainerError::Truncated`].
pub fn inspect(bytes: &[u8]) -> ContainerResult<ContainerInfo> {
    Ok(parse_header(bytes)?.info)
}

fn parse_header(bytes: &[u8]) -> ContainerResult<Header> {
    if bytes.len() < HEADER_SIZE {
        return Err(ContainerError::TooSmall(bytes.len()));
    }
    let mut magic = [0u8; 4];
    magic.copy_from_slice(&bytes[0..4]);
    if magic != MAGIC {
        return Err(ContainerError::BadMagic(magic));
    }
    let version = bytes[4];
    if version != FORMAT_VERSION {
        return Err(ContainerError::UnsupportedVersion(version));
    }
    let pattern = BayerPattern::from_id(bytes[5]).unwrap_or_default();
    let width = u16::from_le_bytes([bytes[6], bytes[7]]) as usize;
    let height = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
    let quality = bytes[10];
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]) as usize;
    let crc = u32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let available = bytes.len() - HEADER_SIZE;
    if payload_len > available {
        return Err(ContainerError::Truncated {
            declared: payload_len,
            available,
        });
    }
    Ok(Header {
        info: ContainerInfo {
            version,
            pattern,
            width,
            height,
            quality,
            payload_len,
        },
        crc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(value: u8, w: usize, h: usize, pattern: BayerPattern) -> CfaImage {
        CfaImage::new(vec![value; w * h], w, h, pattern).unwrap()
    }

    fn textured(w: usize, h: usize) -> CfaImage {
        let data = (0..w * h)
            .map(|i| (((i % w) * 13 + (i / w) * 29) % 256) as u8)
            .collect();
        CfaImage::new(data, w, h, BayerPattern::Rggb).unwrap()
    }

    fn mean_abs_error(a: &[u8], b: &[u8]) -> f64 {
        let total: u64 = a
            .iter()
            .zip(b)
            .map(|(&x, &y)| (x as i16 - y as i16).unsigned_abs() as u64)
            .sum();
        total as f64 / a.len() as f64
    }

    /// Codec that stores the grid raw behind a 4 byte dimension prefix.
    struct RawCodec;

    impl MosaicCodec for RawCodec {
        fn compress(
            &self,
            data: &[u8],
            width: usize,
            height: usize,
            _quality: u8,
        ) -> ContainerResult<Vec<u8>> {
            let mut out = Vec::with_capacity(4 + data.len());
            out.extend_from_slice(&(width as u16).to_le_bytes());
            out.extend_from_slice(&(height as u16).to_le_bytes());
            out.extend_from_slice(data);
            Ok(out)
        }

        fn decompress(&self, bytes: &[u8]) -> ContainerResult<(Vec<u8>, usize, usize)> {
            if bytes.len() < 4 {
                return Err(ContainerError::Codec("missing dimension prefix".into()));
            }
            let width = u16::from_le_bytes([bytes[0], bytes[1]]) as usize;
            let height = u16::from_le_bytes([bytes[2], bytes[3]]) as usize;
            Ok((bytes[4..].to_vec(), width, height))
        }
    }

    #[test]
    fn test_header_layout() {
        let cfa = uniform(128, 6, 4, BayerPattern::Grbg);
        let bytes = encode(&cfa, 80).unwrap();
        assert_eq!(&bytes[0..4], b"MOSA");
        assert_eq!(bytes[4], 1);
        assert_eq!(bytes[5], 2);
        assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 6);
        assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 4);
        assert_eq!(bytes[10], 80);
        assert_eq!(bytes[11], 0);
        let payload_len =
            u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]) as usize;
        assert_eq!(payload_len, bytes.len() - HEADER_SIZE);
        let crc = u32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        assert_eq!(crc, crc32fast::hash(&bytes[HEADER_SIZE..]));
    }

    #[test]
    fn test_uniform_roundtrip_is_bit_exact() {
        // A flat grid compresses to pure DC blocks, which JPEG stores
        // exactly at any quality.
        for quality in [30, 60, 90] {
            let cfa = uniform(128, 10, 10, BayerPattern::Bggr);
            let bytes = encode(&cfa, quality).unwrap();
            let (back, info) = decode(&bytes).unwrap();
            assert_eq!(back.as_slice(), cfa.as_slice(), "quality {quality}");
            assert_eq!(back.pattern(), BayerPattern::Bggr);
            assert_eq!(info.quality, quality);
        }
        let cfa = uniform(77, 16, 8, BayerPattern::Rggb);
        let bytes = encode(&cfa, 100).unwrap();
        let (back, _) = decode(&bytes).unwrap();
        assert_eq!(back.as_slice(), cfa.as_slice());
    }

    #[test]
    fn test_decode_preserves_shape_and_pattern() {
        let cfa = textured(17, 11);
        let bytes = encode(&cfa, 85).unwrap();
        let (back, info) = decode(&bytes).unwrap();
        assert_eq!(back.width(), 17);
        assert_eq!(back.height(), 11);
        assert_eq!(back.pattern(), BayerPattern::Rggb);
        assert_eq!(info.width, 17);
        assert_eq!(info.height, 11);
        assert_eq!(info.version, FORMAT_VERSION);
        assert_eq!(info.payload_len, bytes.len() - HEADER_SIZE);
    }

    #[test]
    fn test_quality_ladder_improves_fidelity() {
        let cfa = textured(16, 16);
        let mut errors = Vec::new();
        for quality in [10, 50, 95] {
            let bytes = encode(&cfa, quality).unwrap();
            let (back, _) = decode(&bytes).unwrap();
            errors.push(mean_abs_error(cfa.as_slice(), back.as_slice()));
        }
        assert!(errors[0] >= errors[1], "{errors:?}");
        assert!(errors[1] >= errors[2], "{errors:?}");
    }

    #[test]
    fn test_invalid_quality() {
        let cfa = uniform(10, 4, 4, BayerPattern::Rggb);
        assert_eq!(
            encode(&cfa, 0),
            Err(ContainerError::InvalidQuality(0))
        );
        assert_eq!(
            encode(&cfa, 101),
            Err(ContainerError::InvalidQuality(101))
        );
    }

    #[test]
    fn test_oversized_dimensions() {
        let cfa = CfaImage::new(vec![0; 70000 * 2], 70000, 2, BayerPattern::Rggb).unwrap();
        assert_eq!(
            encode(&cfa, 90),
            Err(ContainerError::DimensionTooLarge {
                width: 70000,
                height: 2
            })
        );
    }

    #[test]
    fn test_too_small_buffer() {
        let cfa = uniform(1, 4, 4, BayerPattern::Rggb);
        let bytes = encode(&cfa, 50).unwrap();
        assert_eq!(decode(&bytes[..10]), Err(ContainerError::TooSmall(10)));
        assert_eq!(decode(&[]), Err(ContainerError::TooSmall(0)));
    }

    #[test]
    fn test_bad_magic() {
        let cfa = uniform(1, 4, 4, BayerPattern::Rggb);
        let mut bytes = encode(&cfa, 50).unwrap();
        bytes[0] = b'X';
        let expected = [b'X', b'O', b'S', b'A'];
        assert_eq!(decode(&bytes), Err(ContainerError::BadMagic(expected)));
        assert_eq!(inspect(&bytes), Err(ContainerError::BadMagic(expected)));
    }

    #[test]
    fn test_unsupported_version() {
        let cfa = uniform(1, 4, 4, BayerPattern::Rggb);
        let mut bytes = encode(&cfa, 50).unwrap();
        bytes[4] = 2;
        assert_eq!(decode(&bytes), Err(ContainerError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_truncated_payload() {
        let cfa = textured(8, 8);
        let bytes = encode(&cfa, 70).unwrap();
        let cut = &bytes[..bytes.len() - 1];
        let declared = bytes.len() - HEADER_SIZE;
        assert_eq!(
            decode(cut),
            Err(ContainerError::Truncated {
                declared,
                available: declared - 1
            })
        );
    }

    #[test]
    fn test_any_payload_byte_flip_fails_checksum() {
        let cfa = textured(12, 12);
        let clean = encode(&cfa, 70).unwrap();
        for index in HEADER_SIZE..clean.len() {
            let mut bytes = clean.clone();
            bytes[index] ^= 1 << (index % 8);
            match decode(&bytes) {
                Err(ContainerError::ChecksumMismatch { .. }) => {}
                other => panic!("flip at {index}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_stored_crc_corruption_fails_checksum() {
        let cfa = textured(8, 8);
        let mut bytes = encode(&cfa, 70).unwrap();
        bytes[16] ^= 0xFF;
        assert!(matches!(
            decode(&bytes),
            Err(ContainerError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_garbage_payload_with_valid_crc_is_codec_failure() {
        let payload = b"definitely not a jpeg";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC);
        bytes.push(FORMAT_VERSION);
        bytes.push(0);
        bytes.extend_from_slice(&4u16.to_le_bytes());
        bytes.extend_from_slice(&4u16.to_le_bytes());
        bytes.push(50);
        bytes.push(0);
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
        bytes.extend_from_slice(payload);
        assert!(matches!(decode(&bytes), Err(ContainerError::Codec(_))));
        // The header itself is fine, so inspection still works.
        let info = inspect(&bytes).unwrap();
        assert_eq!(info.width, 4);
        assert_eq!(info.payload_len, payload.len());
    }

    #[test]
    fn test_inspect_reports_header_without_decompressing() {
        let cfa = uniform(128, 10, 10, BayerPattern::Bggr);
        let mut bytes = encode(&cfa, 90).unwrap();
        let info = inspect(&bytes).unwrap();
        assert_eq!(info.pattern, BayerPattern::Bggr);
        assert_eq!(info.width, 10);
        assert_eq!(info.height, 10);
        assert_eq!(info.quality, 90);
        assert_eq!(info.version, 1);
        // Damaging the payload changes nothing for inspection.
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert_eq!(inspect(&bytes).unwrap(), info);
    }

    #[test]
    fn test_unknown_pattern_id_falls_back_to_rggb() {
        let cfa = uniform(90, 6, 6, BayerPattern::Gbrg);
        let mut bytes = encode(&cfa, 90).unwrap();
        bytes[5] = 9;
        assert_eq!(inspect(&bytes).unwrap().pattern, BayerPattern::Rggb);
        let (back, _) = decode(&bytes).unwrap();
        assert_eq!(back.pattern(), BayerPattern::Rggb);
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let cfa = textured(8, 8);
        let mut bytes = encode(&cfa, 70).unwrap();
        let (expected, _) = decode(&bytes).unwrap();
        bytes.extend_from_slice(b"trailing junk");
        let (back, _) = decode(&bytes).unwrap();
        assert_eq!(back, expected);
    }

    #[test]
    fn test_injected_codec_round_trips_raw() {
        let cfa = textured(9, 5);
        let bytes = encode_with(&cfa, 55, &RawCodec).unwrap();
        let info = inspect(&bytes).unwrap();
        assert_eq!(info.quality, 55);
        let (back, _) = decode_with(&bytes, &RawCodec).unwrap();
        assert_eq!(back, cfa);
        // The JPEG codec refuses the raw payload, checksum intact.
        assert!(matches!(decode(&bytes), Err(ContainerError::Codec(_))));
    }

    #[test]
    fn test_codec_dimension_disagreement() {
        let cfa = uniform(5, 4, 4, BayerPattern::Rggb);
        let bytes = encode_with(&cfa, 50, &RawCodec).unwrap();

        struct LyingCodec;
        impl MosaicCodec for LyingCodec {
            fn compress(
                &self,
                _data: &[u8],
                _width: usize,
                _height: usize,
                _quality: u8,
            ) -> ContainerResult<Vec<u8>> {
                unreachable!("decode-only codec")
            }

            fn decompress(&self, bytes: &[u8]) -> ContainerResult<(Vec<u8>, usize, usize)> {
                Ok((bytes[4..].to_vec(), 2, 8))
            }
        }

        match decode_with(&bytes, &LyingCodec) {
            Err(ContainerError::Codec(msg)) => assert!(msg.contains("disagree")),
            other => panic!("{other:?}"),
        }
    }
}
