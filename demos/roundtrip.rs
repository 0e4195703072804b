use cfaimage::{decode, encode, inspect, metrics, BayerPattern, DemosaicMethod, RgbImage};

/// Synthesize a smooth color gradient so the reconstruction quality of
/// the three algorithms is visible in the printed metrics.
fn gradient(width: usize, height: usize) -> RgbImage {
    let mut data = Vec::with_capacity(width * height * 3);
    for row in 0..height {
        for col in 0..width {
            let r = (col * 255 / (width - 1)) as u8;
            let g = (row * 255 / (height - 1)) as u8;
            let b = ((col + row) * 255 / (width + height - 2)) as u8;
            data.extend_from_slice(&[r, g, b]);
        }
    }
    RgbImage::new(data, width, height).expect("Failed to build gradient")
}

fn main() {
    let img = gradient(256, 192);
    let pattern = BayerPattern::Rggb;

    let cfa = img.mosaic(pattern);
    println!(
        "sampled {}x{} image through {pattern}, kept 1 of 3 channels per pixel",
        cfa.width(),
        cfa.height()
    );

    let bytes = encode(&cfa, 90).expect("Failed to encode container");
    let info = inspect(&bytes).expect("Failed to inspect container");
    println!(
        "container: {} bytes total, version {}, pattern {}, quality {}, payload {} bytes",
        bytes.len(),
        info.version,
        info.pattern,
        info.quality,
        info.payload_len
    );

    let (restored, _) = decode(&bytes).expect("Failed to decode container");
    assert_eq!(restored.width(), cfa.width());
    assert_eq!(restored.height(), cfa.height());
    assert_eq!(restored.pattern(), pattern);

    println!("reconstruction quality against the source image:");
    for method in DemosaicMethod::ALL {
        let rgb = restored.demosaic(method).expect("Failed to demosaic");
        let m = metrics(&img, &rgb);
        println!(
            "  {:<20} psnr {:>6.2} dB   ssim {:.4}",
            method.id(),
            m.psnr,
            m.ssim
        );
    }
}
