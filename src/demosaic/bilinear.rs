//! Bilinear demosaicing.
//!
//! Missing samples are gathered straight from same-color neighbours in
//! the raw CFA grid:
//!
//! ```text
//!   green at red/blue:        (up + down + left + right) / 4
//!   red/blue at green:        (two same-row or same-column) / 2
//!   red at blue, blue at red: (four diagonals) / 4
//! ```
//!
//! At a green pixel the channel sampled beside it in the row is taken
//! from the row pair and the remaining channel from the column pair.
//! Out-of-range neighbour indices reflect about the grid edge.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use super::reflect;
use crate::imagedata::CfaImage;
use crate::pattern::Channel;

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
                px[1] = cross(cfa, row, col);
                px[2] = diagonals(cfa, row, col);
            }
            Channel::Blue => {
                px[0] = diagonals(cfa, row, col);
                px[1] = cross(cfa, row, col);
                px[2] = value;
            }
            Channel::Green => {
                px[1] = value;
                if cfa.pattern.channel_at(row, col ^ 1) == Channel::Red {
                    px[0] = row_pair(cfa, row, col);
                    px[2] = column_pair(cfa, row, col);
                } else {
                    px[0] = column_pair(cfa, row, col);
                    px[2] = row_pair(cfa, row, col);
                }
            }
        }
    }
}

fn cross(cfa: &CfaImage, row: usize, col: usize) -> u8 {
    let (r, c) = (row as isize, col as isize);
    let sum = cfa.at(reflect(r - 1, cfa.height), col) as u16
        + cfa.at(reflect(r + 1, cfa.height), col) as u16
        + cfa.at(row, reflect(c - 1, cfa.width)) as u16
        + cfa.at(row, reflect(c + 1, cfa.width)) as u16;
    (sum / 4) as u8
}

fn row_pair(cfa: &CfaImage, row: usize, col: usize) -> u8 {
    let c = col as isize;
    let sum = cfa.at(row, reflect(c - 1, cfa.width)) as u16
        + cfa.at(row, reflect(c + 1, cfa.width)) as u16;
    (sum / 2) as u8
}

fn column_pair(cfa: &CfaImage, row: usize, col: usize) -> u8 {
    let r = row as isize;
    let sum = cfa.at(reflect(r - 1, cfa.height), col) as u16
        + cfa.at(reflect(r + 1, cfa.height), col) as u16;
    (sum / 2) as u8
}

fn diagonals(cfa: &CfaImage, row: usize, col: usize) -> u8 {
    let (r, c) = (row as isize, col as isize);
    let up = reflect(r - 1, cfa.height);
    let down = reflect(r + 1, cfa.height);
    let left = reflect(c - 1, cfa.width);
    let right = reflect(c + 1, cfa.width);
    let sum = cfa.at(up, left) as u16
        + cfa.at(up, right) as u16
        + cfa.at(down, left) as u16
        + cfa.at(down, right) as u16;
    (sum / 4) as u8
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
