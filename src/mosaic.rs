//! Forward CFA sampling and its colorized visualization.

use itertools::izip;

use crate::imagedata::{CfaImage, RgbImage};
use crate::pattern::{bayer_masks, BayerPattern, Channel};

impl RgbImage {
    /// Sample this image through a Bayer color filter array.
    ///
    /// Every position of the result keeps exactly the channel that
    /// `pattern` assigns to its parity class; the other two channels
    /// are discarded. The operation is deterministic and leaves the
    /// source untouched.
    pub fn mosaic(&self, pattern: BayerPattern) -> CfaImage {
        let mut data = Vec::with_capacity(self.width * self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                let channel = pattern.channel_at(row, col);
                data.push(self.at(row, col, channel));
            }
        }
        CfaImage {
            data,
            width: self.width,
            height: self.height,
            pattern,
        }
    }
}

impl CfaImage {
    /// Colorized view of the raw samples for display.
    ///
    /// Each sample is placed back into its originating channel with
    /// the other two channels zeroed. Missing channels are not
    /// recovered; use [`CfaImage::demosaic`] for reconstruction.
    pub fn visualize(&self) -> RgbImage {
        let masks = bayer_masks(self.height, self.width, self.pattern);
        let mut data = vec![0u8; self.width * self.height * 3];
        for (px, &value, &red, &green, &blue) in izip!(
            data.chunks_exact_mut(3),
            self.data.iter(),
            masks.red(),
            masks.green(),
            masks.blue(),
        ) {
            if red {
                px[Channel::Red.index()] = value;
            }
            if green {
                px[Channel::Green.index()] = value;
            }
            if blue {
                px[Channel::Blue.index()] = value;
            }
        }
        RgbImage {
            data,
            width: self.width,
            height: self.height,
        }
    }
}
