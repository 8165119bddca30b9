use image::RgbaImage;

use crate::{
    foundation::{
        core::Size,
        error::{OverlayError, OverlayResult},
    },
    render::blend::{PremulRgba8, unpremultiply},
};

/// Top-down 32-bit premultiplied ARGB pixels (`0xAARRGGBB`), row-major, tightly packed.
///
/// The dimensions are fixed for the lifetime of the buffer; a different size needs a new
/// buffer.
#[derive(Debug)]
pub struct PixelBuffer {
    size: Size,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Allocates a zeroed (transparent black) buffer.
    pub fn allocate(size: Size) -> OverlayResult<Self> {
        if size.is_empty() {
            return Err(OverlayError::alloc(format!("buffer size {size} has zero area")));
        }
        let len = size
            .area()
            .filter(|&n| n.checked_mul(4).is_some_and(|b| b <= isize::MAX as usize))
            .ok_or_else(|| OverlayError::alloc(format!("buffer size {size} overflows")))?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|e| OverlayError::alloc(format!("reserve {size} buffer: {e}")))?;
        pixels.resize(len, 0);
        Ok(Self { size, pixels })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.size.width as usize * 4
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.size.width as usize + x as usize)
            .copied()
    }

    /// Sets every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn is_clear(&self) -> bool {
        self.pixels.iter().all(|&p| p == 0)
    }

    /// Straight-alpha RGBA8 copy, e.g. for writing a PNG snapshot.
    pub fn to_straight_rgba8(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.size.width, self.size.height);
        for (dst, &src) in out.pixels_mut().zip(&self.pixels) {
            dst.0 = unpremultiply(unpack_argb(src));
        }
        out
    }
}

/// Packs premultiplied RGBA bytes into `0xAARRGGBB`.
pub fn pack_argb(px: PremulRgba8) -> u32 {
    let [r, g, b, a] = px.map(u32::from);
    (a << 24) | (r << 16) | (g << 8) | b
}

/// Inverse of [`pack_argb`].
pub fn unpack_argb(px: u32) -> PremulRgba8 {
    [(px >> 16) as u8, (px >> 8) as u8, px as u8, (px >> 24) as u8]
}

#[cfg(test)]
#[path = "../../tests/unit/render/buffer.rs"]
mod tests;
