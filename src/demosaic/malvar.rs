//! Gradient-corrected linear demosaicing after Malvar, He and Cutler.
//!
//! Four fixed 5x5 kernels run over the raw CFA grid. Every missing
//! sample takes exactly one kernel, chosen by the pixel's own color
//! and, at green pixels, by the color sampled beside it in the row:
//!
//! ```text
//!   green at red/blue (/8):      chroma at green, row pair (/16):
//!        0  0 -1  0  0                 0  0  1  0  0
//!        0  0  2  0  0                 0 -2  0 -2  0
//!       -1  2  4  2 -1                -2  8 10  8 -2
//!        0  0  2  0  0                 0 -2  0 -2  0
//!        0  0 -1  0  0                 0  0  1  0  0
//!
//!   chroma at green, column pair: the transpose of the row kernel.
//!
//!   red at blue / blue at red (/16):
//!        0  0 -3  0  0
//!        0  4  0  4  0
//!       -3  0 12  0 -3
//!        0  4  0  4  0
//!        0  0 -3  0  0
//! ```
//!
//! Red at a green pixel whose row mate is blue takes the row kernel;
//! red at a green pixel whose row mate is red takes the column kernel.
//! Blue mirrors that choice. Out-of-range kernel taps reflect about
//! the grid edge, duplicating the edge sample.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use super::reflect;
use crate::imagedata::CfaImage;
use crate::pattern::Channel;

#[rustfmt::skip]
const KERNEL_GREEN: [i32; 25] = [
     0, 0, -1, 0,  0,
     0, 0,  2, 0,  0,
    -1, 2,  4, 2, -1,
     0, 0,  2, 0,  0,
     0, 0, -1, 0,  0,
];

#[rustfmt::skip]
const KERNEL_ROW: [i32; 25] = [
     0,  0,  1,  0,  0,
     0, -2,  0, -2,  0,
    -2,  8, 10,  8, -2,
     0, -2,  0, -2,  0,
     0,  0,  1,  0,  0,
];

#[rustfmt::skip]
const KERNEL_COLUMN: [i32; 25] = [
     0,  0, -2,  0,  0,
     0, -2,  8, -2,  0,
     1,  0, 10,  0,  1,
     0, -2,  8, -2,  0,
     0,  0, -2,  0,  0,
];

#[rustfmt::skip]
const KERNEL_DIAGONAL: [i32; 25] = [
     0, 0, -3, 0,  0,
     0, 4,  0, 4,  0,
    -3, 0, 12, 0, -3,
     0, 4,  0, 4,  0,
     0, 0, -3, 0,  0,
];

pub(super) fn run(cfa: &CfaImage) -> Vec<u8> {
    let mut out = vec![0u8; cfa.width * cfa.height * 3];
    debayer(cfa, &mut out);
    out
}

fn fill_row(cfa: &CfaImage, row: usize, line: &mut [u8]) {
    for col in 0..cfa.width {
        let px = &mut line[col * 3..col * 3 + 3];
        let value = cfa.at(row, col);
        match cfa.pattern.channel_at(row, col) {
            Channel::Red => {
                px[0] = value;
                px[1] = convolve(cfa, row, col, &KERNEL_GREEN, 8);
                px[2] = convolve(cfa, row, col, &KERNEL_DIAGONAL, 16);
            }
            Channel::Blue => {
                px[0] = convolve(cfa, row, col, &KERNEL_DIAGONAL, 16);
                px[1] = convolve(cfa, row, col, &KERNEL_GREEN, 8);
                px[2] = value;
            }
            Channel::Green => {
                px[1] = value;
                if cfa.pattern.channel_at(row, col ^ 1) == Channel::Red {
                    px[0] = convolve(cfa, row, col, &KERNEL_COLUMN, 16);
                    px[2] = convolve(cfa, row, col, &KERNEL_ROW, 16);
                } else {
                    px[0] = convolve(cfa, row, col, &KERNEL_ROW, 16);
                    px[2] = convolve(cfa, row, col, &KERNEL_COLUMN, 16);
                }
            }
        }
    }
}

fn convolve(cfa: &CfaImage, row: usize, col: usize, kernel: &[i32; 25], divisor: i32) -> u8 {
    let mut sum = 0i32;
    for (i, &weight) in kernel.iter().enumerate() {
        if weight == 0 {
            continue;
        }
        let dy = (i / 5) as isize - 2;
        let dx = (i % 5) as isize - 2;
        let y = reflect(row as isize + dy, cfa.height);
        let x = reflect(col as isize + dx, cfa.width);
        sum += weight * cfa.at(y, x) as i32;
    }
    (sum / divisor).clamp(0, 255) as u8
}

/*--------------------------------------------------------------*/
/* Rayon                                                        */
/*--------------------------------------------------------------*/

#[cfg(feature = "rayon")]
fn debayer(cfa: &CfaImage, out: &mut [u8]) {
    out.par_chunks_mut(cfa.width * 3)
        .enumerate()
        .for_each(|(row, line)| fill_row(cfa, row, line));
}

/*--------------------------------------------------------------*/
/* Naive                                                        */
/*--------------------------------------------------------------*/

#[cfg(not(feature = "rayon"))]
fn debayer(cfa: &CfaImage, out: &mut [u8]) {
    for (row, line) in out.chunks_mut(cfa.width * 3).enumerate() {
        fill_row(cfa, row, line);
    }
}
