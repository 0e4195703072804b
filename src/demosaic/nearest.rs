//! Nearest-neighbour demosaicing.
//!
//! The grid splits into 2x2 tiles aligned to the pattern origin. Every
//! tile carries one red sample, one blue sample and two greens; the
//! greens are averaged with integer floor division and the resulting
//! triple is broadcast to all four tile pixels. When a dimension is
//! odd, the trailing row and then the trailing column replicate their
//! last computed neighbour.

use crate::imagedata::CfaImage;
use crate::pattern::Channel;

pub(super) fn run(cfa: &CfaImage) -> Vec<u8> {
    let (w, h) = (cfa.width, cfa.height);
    let mut out = vec![0u8; w * h * 3];

    for ty in (0..h - 1).step_by(2) {
        for tx in (0..w - 1).step_by(2) {
            let mut red = 0u8;
            let mut blue = 0u8;
            let mut greens = [0u8; 2];
            let mut seen = 0;
            for dy in 0..2 {
                for dx in 0..2 {
                    let value = cfa.at(ty + dy, tx + dx);
                    match cfa.pattern.channel_at(dy, dx) {
                        Channel::Red => red = value,
                        Channel::Blue => blue = value,
                        Channel::Green => {
                            greens[seen] = value;
                            seen += 1;
                        }
                    }
                }
            }
            let green = ((greens[0] as u16 + greens[1] as u16) / 2) as u8;
            for dy in 0..2 {
                for dx in 0..2 {
                    let i = ((ty + dy) * w + tx + dx) * 3;
                    out[i] = red;
                    out[i + 1] = green;
                    out[i + 2] = blue;
                }
            }
        }
    }

    if h % 2 == 1 {
        let (head, last) = out.split_at_mut((h - 1) * w * 3);
        last.copy_from_slice(&head[(h - 2) * w * 3..]);
    }
    if w % 2 == 1 {
        for row in 0..h {
            let base = row * w * 3;
            let src = base + (w - 2) * 3;
            out.copy_within(src..src + 3, base + (w - 1) * 3);
        }
    }

    out
}
