//! Reconstruction quality metrics.
//!
//! Both metrics compare a reconstructed image against its source and
//! are recomputed from scratch on every call. Shape agreement is the
//! caller's contract; mismatched inputs panic rather than producing a
//! number that means nothing.

use itertools::izip;
use serde::Serialize;

use crate::imagedata::RgbImage;

const K1: f64 = 0.01;
const K2: f64 = 0.03;
const DATA_RANGE: f64 = 255.0;
const MAX_WINDOW: usize = 7;
const MIN_WINDOW: usize = 3;

/// Quality metrics for one original/reconstruction pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    /// Peak signal-to-noise ratio in decibels. Infinite when the
    /// images are identical.
    pub psnr: f64,
    /// Mean structural similarity index, nominally in `[-1, 1]`.
    pub ssim: f64,
}

/// Peak signal-to-noise ratio between two images, in decibels.
///
/// Computes the mean squared error over every channel of every pixel
/// in double precision. Identical images give `f64::INFINITY`;
/// anything else gives `20 * log10(255 / sqrt(mse))` rounded to two
/// decimal places.
///
/// # Panics
/// If the images do not share the same dimensions.
pub fn psnr(original: &RgbImage, reconstructed: &RgbImage) -> f64 {
    assert_same_shape(original, reconstructed);
    let squares: f64 = izip!(original.as_slice(), reconstructed.as_slice())
        .map(|(&a, &b)| {
            let d = a as f64 - b as f64;
            d * d
        })
        .sum();
    let mse = squares / original.len() as f64;
    if mse == 0.0 {
        return f64::INFINITY;
    }
    round_to(20.0 * (DATA_RANGE / mse.sqrt()).log10(), 2)
}

/// Mean structural similarity index between two images.
///
/// A square uniform window slides over each channel; only fully
/// interior positions contribute. The window side is the largest odd
/// value that exceeds neither 7 nor the smaller image dimension, with
/// a floor of 3. Per-window indices use the stabilizing constants
/// `C1 = (0.01 * 255)^2` and `C2 = (0.03 * 255)^2` and sample
/// normalized (co)variances, and are averaged per channel and then
/// across the three channels. The result is rounded to four decimal
/// places.
///
/// # Panics
/// If the images do not share the same dimensions, or either dimension
/// is smaller than the 3 pixel minimum window.
pub fn ssim(original: &RgbImage, reconstructed: &RgbImage) -> f64 {
    assert_same_shape(original, reconstructed);
    let (w, h) = (original.width(), original.height());
    let win = window_size(w.min(h));
    assert!(
        win <= w.min(h),
        "images must be at least {MIN_WINDOW}x{MIN_WINDOW} for SSIM, got {w}x{h}"
    );
    let mut total = 0.0;
    for channel in 0..3 {
        let a = channel_plane(original, channel);
        let b = channel_plane(reconstructed, channel);
        total += channel_ssim(&a, &b, w, h, win);
    }
    round_to(total / 3.0, 4)
}

/// Compute both quality metrics for one comparison.
///
/// # Panics
/// Under the same conditions as [`psnr`] and [`ssim`].
pub fn metrics(original: &RgbImage, reconstructed: &RgbImage) -> Metrics {
    Metrics {
        psnr: psnr(original, reconstructed),
        ssim: ssim(original, reconstructed),
    }
}

fn assert_same_shape(a: &RgbImage, b: &RgbImage) {
    assert!(
        a.width() == b.width() && a.height() == b.height(),
        "image shapes differ: {}x{} vs {}x{}",
        a.width(),
        a.height(),
        b.width(),
        b.height()
    );
}

fn window_size(min_dim: usize) -> usize {
    let mut win = MAX_WINDOW.min(min_dim);
    if win % 2 == 0 {
        win -= 1;
    }
    win.max(MIN_WINDOW)
}

fn channel_plane(img: &RgbImage, channel: usize) -> Vec<f64> {
    img.as_slice()
        .iter()
        .skip(channel)
        .step_by(3)
        .map(|&v| v as f64)
        .collect()
}

fn channel_ssim(a: &[f64], b: &[f64], w: usize, h: usize, win: usize) -> f64 {
    let np = (win * win) as f64;
    let cov_norm = np / (np - 1.0);
    let c1 = (K1 * DATA_RANGE).powi(2);
    let c2 = (K2 * DATA_RANGE).powi(2);

    let mut total = 0.0;
    let mut windows = 0usize;
    for y0 in 0..=(h - win) {
        for x0 in 0..=(w - win) {
            let (mut sx, mut sy) = (0.0f64, 0.0f64);
            let (mut sxx, mut syy, mut sxy) = (0.0f64, 0.0f64, 0.0f64);
            for y in y0..y0 + win {
                let row_a = &a[y * w + x0..y * w + x0 + win];
                let row_b = &b[y * w + x0..y * w + x0 + win];
                for (&xa, &xb) in izip!(row_a, row_b) {
                    sx += xa;
                    sy += xb;
                    sxx += xa * xa;
                    syy += xb * xb;
                    sxy += xa * xb;
                }
            }
            let ux = sx / np;
            let uy = sy / np;
            let vx = cov_norm * (sxx / np - ux * ux);
            let vy = cov_norm * (syy / np - uy * uy);
            let vxy = cov_norm * (sxy / np - ux * uy);
            let s = ((2.0 * ux * uy + c1) * (2.0 * vxy + c2))
                / ((ux * ux + uy * uy + c1) * (vx + vy + c2));
            total += s;
            windows += 1;
        }
    }
    total / windows as f64
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
