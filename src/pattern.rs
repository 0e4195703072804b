//! Bayer pattern definitions and per-color sample location masks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CfaError;

/// One of the three color channels of an RGB image.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Red channel.
    Red = 0,
    /// Green channel.
    Green = 1,
    /// Blue channel.
    Blue = 2,
}

impl Channel {
    /// Offset of this channel inside an interleaved RGB triple.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Red => write!(f, "R"),
            Channel::Green => write!(f, "G"),
            Channel::Blue => write!(f, "B"),
        }
    }
}

/// The 2x2 color filter array pattern of a sensor.
///
/// The four letters name the colors of the top-left, top-right,
/// bottom-left and bottom-right pixels of the repeating 2x2 block, in
/// that order. The block tiles the full sensor, so the color seen at
/// any position depends only on its row and column parity.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BayerPattern {
    /// Red, green / green, blue.
    #[default]
    Rggb = 0,
    /// Blue, green / green, red.
    Bggr = 1,
    /// Green, red / blue, green.
    Grbg = 2,
    /// Green, blue / red, green.
    Gbrg = 3,
}

impl BayerPattern {
    /// All four patterns, in wire id order.
    pub const ALL: [BayerPattern; 4] = [
        BayerPattern::Rggb,
        BayerPattern::Bggr,
        BayerPattern::Grbg,
        BayerPattern::Gbrg,
    ];

    /// The four channels of the repeating block in row-major order.
    pub fn layout(self) -> [Channel; 4] {
        use Channel::{Blue as B, Green as G, Red as R};
        match self {
            BayerPattern::Rggb => [R, G, G, B],
            BayerPattern::Bggr => [B, G, G, R],
            BayerPattern::Grbg => [G, R, B, G],
            BayerPattern::Gbrg => [G, B, R, G],
        }
    }

    /// Channel sampled at `(row, col)` under this pattern.
    pub fn channel_at(self, row: usize, col: usize) -> Channel {
        self.layout()[(row % 2) * 2 + col % 2]
    }

    /// Identifier used in the container header.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Pattern for a container header identifier, if it is known.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(BayerPattern::Rggb),
            1 => Some(BayerPattern::Bggr),
            2 => Some(BayerPattern::Grbg),
            3 => Some(BayerPattern::Gbrg),
            _ => None,
        }
    }

    /// Canonical uppercase name.
    pub fn name(self) -> &'static str {
        match self {
            BayerPattern::Rggb => "RGGB",
            BayerPattern::Bggr => "BGGR",
            BayerPattern::Grbg => "GRBG",
            BayerPattern::Gbrg => "GBRG",
        }
    }
}

impl fmt::Display for BayerPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BayerPattern {
    type Err = CfaError;

    /// Parses the four pattern names, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RGGB" => Ok(BayerPattern::Rggb),
            "BGGR" => Ok(BayerPattern::Bggr),
            "GRBG" => Ok(BayerPattern::Grbg),
            "GBRG" => Ok(BayerPattern::Gbrg),
            _ => Err(CfaError::UnknownPattern(s.to_string())),
        }
    }
}

/// Per-color sample location masks over one sensor grid.
///
/// The three planes are mutually exclusive and jointly exhaustive:
/// every position is true in exactly one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMasks {
    width: usize,
    height: usize,
    red: Vec<bool>,
    green: Vec<bool>,
    blue: Vec<bool>,
}

impl ColorMasks {
    /// Mask width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Mask height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major red sample locations.
    pub fn red(&self) -> &[bool] {
        &self.red
    }

    /// Row-major green sample locations.
    pub fn green(&self) -> &[bool] {
        &self.green
    }

    /// Row-major blue sample locations.
    pub fn blue(&self) -> &[bool] {
        &self.blue
    }

    /// The mask plane holding `channel` sample locations.
    pub fn plane(&self, channel: Channel) -> &[bool] {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }
}

/// Compute the per-color sample location masks of `pattern` over a
/// `height` by `width` grid.
pub fn bayer_masks(height: usize, width: usize, pattern: BayerPattern) -> ColorMasks {
    let len = width * height;
    let mut red = vec![false; len];
    let mut green = vec![false; len];
    let mut blue = vec![false; len];
    for row in 0..height {
        for col in 0..width {
            let i = row * width + col;
            match pattern.channel_at(row, col) {
                Channel::Red => red[i] = true,
                Channel::Green => green[i] = true,
                Channel::Blue => blue[i] = true,
            }
        }
    }
    ColorMasks {
        width,
        height,
        red,
        green,
        blue,
    }
}
