use image::{RgbaImage, imageops::FilterType};

use crate::{
    assets::decode::AnimatedImage,
    foundation::{
        core::Size,
        error::{OverlayError, OverlayResult},
    },
    render::{
        blend::{clamp_premul, over},
        buffer::{PixelBuffer, pack_argb},
    },
};

/// Buffer plus the resampling scratch image; created and dropped together.
#[derive(Debug)]
struct RenderTarget {
    buffer: PixelBuffer,
    scratch: Option<RgbaImage>,
}

/// Draws the selected frame of an [`AnimatedImage`] into an owned off-screen buffer.
#[derive(Debug, Default)]
pub struct Compositor {
    target: Option<RenderTarget>,
    renders: u64,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases any current buffer, then allocates a fresh one of `size`.
    pub fn allocate(&mut self, size: Size) -> OverlayResult<()> {
        self.release();
        let buffer = PixelBuffer::allocate(size)?;
        tracing::debug!(%size, "allocated compositor buffer");
        self.target = Some(RenderTarget {
            buffer,
            scratch: None,
        });
        Ok(())
    }

    /// Reallocates only when `size` differs from the current buffer.
    pub fn ensure_size(&mut self, size: Size) -> OverlayResult<()> {
        match &self.target {
            Some(t) if t.buffer.size() == size => Ok(()),
            _ => self.allocate(size),
        }
    }

    /// Like [`Compositor::ensure_size`], but the new buffer is allocated before the current
    /// one is dropped. On failure the current buffer stays usable.
    pub fn resize(&mut self, size: Size) -> OverlayResult<()> {
        if self.buffer().is_some_and(|b| b.size() == size) {
            return Ok(());
        }
        let buffer = PixelBuffer::allocate(size)?;
        tracing::debug!(%size, "resized compositor buffer");
        self.target = Some(RenderTarget {
            buffer,
            scratch: None,
        });
        Ok(())
    }

    /// Drops buffer and scratch. Returns whether anything was held.
    pub fn release(&mut self) -> bool {
        self.target.take().is_some()
    }

    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.target.as_ref().map(|t| &t.buffer)
    }

    pub fn is_allocated(&self) -> bool {
        self.target.is_some()
    }

    /// Number of completed [`Compositor::render`] calls.
    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// Clears the buffer, selects `frame_index` on `image` and draws it scaled to the
    /// buffer with bicubic resampling and source-over blending.
    pub fn render(&mut self, image: &mut AnimatedImage, frame_index: usize) -> OverlayResult<()> {
        let RenderTarget { buffer, scratch } = self
            .target
            .as_mut()
            .ok_or_else(|| OverlayError::alloc("render called without a buffer"))?;

        buffer.clear();
        image.select_frame(frame_index)?;

        let frame = image.active_frame();
        let (w, h) = (buffer.width(), buffer.height());
        let src: &RgbaImage = if frame.dimensions() == (w, h) {
            frame
        } else {
            let mut resized = image::imageops::resize(frame, w, h, FilterType::CatmullRom);
            for px in resized.pixels_mut() {
                px.0 = clamp_premul(px.0);
            }
            scratch.insert(resized)
        };

        for (dst, s) in buffer.pixels_mut().iter_mut().zip(src.pixels()) {
            *dst = over(*dst, pack_argb(s.0));
        }

        self.renders += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
