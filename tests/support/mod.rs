#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{Delay, Frame, Rgba, RgbaImage, codecs::gif::GifEncoder};

pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "bouncegif_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// GIF with one solid frame per delay, each frame a different color, a transparent
/// 1px border around every frame.
pub fn gif_bytes(width: u32, height: u32, delays_ms: &[u32]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut enc = GifEncoder::new(&mut buf);
        enc.set_repeat(image::codecs::gif::Repeat::Infinite)
            .unwrap();
        enc.encode_frames(delays_ms.iter().enumerate().map(|(i, d)| {
            let mut img = RgbaImage::new(width, height);
            for (x, y, px) in img.enumerate_pixels_mut() {
                let border = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
                *px = if border {
                    Rgba([0, 0, 0, 0])
                } else {
                    Rgba([(i as u8).wrapping_mul(80), 200, 40, 255])
                };
            }
            Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(*d, 1))
        }))
        .unwrap();
    }
    buf
}

pub fn write_gif(dir: &Path, name: &str, width: u32, height: u32, delays_ms: &[u32]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, gif_bytes(width, height, delays_ms)).unwrap();
    path
}
