use std::{io::Cursor, path::Path};

use image::{
    AnimationDecoder, Delay, Frame, Frames, ImageDecoder, ImageFormat, RgbaImage,
    codecs::{gif::GifDecoder, png::PngDecoder, webp::WebPDecoder},
};

use crate::{
    animation::durations::DurationTable,
    foundation::{
        core::Size,
        error::{OverlayError, OverlayResult},
    },
};

/// Decoded asset: every frame as a full-canvas premultiplied RGBA8 image plus the raw
/// per-frame delay metadata, and the frame currently selected for drawing.
#[derive(Clone, Debug)]
pub struct AnimatedImage {
    size: Size,
    /// Premultiplied RGBA8, each exactly `size`.
    frames: Vec<RgbaImage>,
    /// Native delays in hundredths of a second, when the container has any.
    delays_cs: Option<Vec<u32>>,
    active: usize,
    format: Option<ImageFormat>,
}

impl AnimatedImage {
    /// Builds an image from straight-alpha RGBA frames. Frames must all match `size`.
    pub fn from_straight_frames(
        size: Size,
        frames: Vec<RgbaImage>,
        delays_cs: Option<Vec<u32>>,
    ) -> OverlayResult<Self> {
        if size.is_empty() {
            return Err(OverlayError::decode(format!("image has zero area ({size})")));
        }
        if frames.is_empty() {
            return Err(OverlayError::decode("asset contains no frames"));
        }
        let mut frames = frames;
        for (i, f) in frames.iter_mut().enumerate() {
            if f.dimensions() != (size.width, size.height) {
                return Err(OverlayError::decode(format!(
                    "frame {i} is {}x{}, expected {size}",
                    f.width(),
                    f.height()
                )));
            }
            premultiply_rgba8_in_place(f);
        }
        Ok(Self {
            size,
            frames,
            delays_cs,
            active: 0,
            format: None,
        })
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

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Raw delay metadata in hundredths of a second.
    pub fn delay_metadata(&self) -> Option<&[u32]> {
        self.delays_cs.as_deref()
    }

    /// Sets the frame used by subsequent draws. The caller wraps the index.
    pub fn select_frame(&mut self, index: usize) -> OverlayResult<()> {
        if index >= self.frames.len() {
            return Err(OverlayError::decode(format!(
                "frame index {index} out of range (frame count {})",
                self.frames.len()
            )));
        }
        self.active = index;
        Ok(())
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Premultiplied pixels of the selected frame.
    pub fn active_frame(&self) -> &RgbaImage {
        &self.frames[self.active]
    }
}

/// Builds the display-duration table for `image`.
pub fn durations_for(image: &AnimatedImage) -> DurationTable {
    DurationTable::from_centiseconds(image.delay_metadata(), image.frame_count())
}

/// Reads and decodes the asset at `path`.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> OverlayResult<AnimatedImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| OverlayError::decode(format!("read '{}': {e}", path.display())))?;
    let img = decode_animated(&bytes)?;
    tracing::debug!(
        width = img.width(),
        height = img.height(),
        frames = img.frame_count(),
        format = ?img.format(),
        "decoded asset"
    );
    Ok(img)
}

/// Upper bound on the memory the decoded frames of one asset may occupy.
pub const MAX_DECODED_BYTES: u64 = 1 << 30;

/// Decodes GIF, APNG and animated WebP into all of their frames. Any other format the
/// `image` crate understands is loaded as a single frame without delay metadata.
pub fn decode_animated(bytes: &[u8]) -> OverlayResult<AnimatedImage> {
    decode_with_budget(bytes, MAX_DECODED_BYTES)
}

fn decode_with_budget(bytes: &[u8], budget: u64) -> OverlayResult<AnimatedImage> {
    let format = image::guess_format(bytes)
        .map_err(|e| OverlayError::decode(format!("unrecognised image container: {e}")))?;

    let mut img = match format {
        ImageFormat::Gif => {
            let dec = GifDecoder::new(Cursor::new(bytes)).map_err(decode_err("gif header"))?;
            let (w, h) = dec.dimensions();
            collect_frames(Size::new(w, h), dec.into_frames(), budget)?
        }
        ImageFormat::Png => {
            let dec = PngDecoder::new(Cursor::new(bytes)).map_err(decode_err("png header"))?;
            if dec.is_apng().map_err(decode_err("png animation control"))? {
                let (w, h) = dec.dimensions();
                let apng = dec.apng().map_err(decode_err("apng"))?;
                collect_frames(Size::new(w, h), apng.into_frames(), budget)?
            } else {
                decode_still(bytes, format)?
            }
        }
        ImageFormat::WebP => {
            let dec = WebPDecoder::new(Cursor::new(bytes)).map_err(decode_err("webp header"))?;
            if dec.has_animation() {
                let (w, h) = dec.dimensions();
                collect_frames(Size::new(w, h), dec.into_frames(), budget)?
            } else {
                decode_still(bytes, format)?
            }
        }
        _ => decode_still(bytes, format)?,
    };
    img.format = Some(format);
    Ok(img)
}

fn collect_frames(size: Size, frames: Frames<'_>, budget: u64) -> OverlayResult<AnimatedImage> {
    let frame_bytes = u64::from(size.width) * u64::from(size.height) * 4;
    check_budget(size, frame_bytes, 1, budget)?;

    let mut decoded = Vec::new();
    for frame in frames {
        let frame = frame.map_err(decode_err("animation frame"))?;
        decoded.push(frame);
        check_budget(size, frame_bytes, decoded.len(), budget)?;
    }
    assemble_frames(size, decoded)
}

fn check_budget(size: Size, frame_bytes: u64, count: usize, budget: u64) -> OverlayResult<()> {
    if frame_bytes.saturating_mul(count as u64) > budget {
        return Err(OverlayError::decode(format!(
            "{count} frames of {size} exceed the decode budget of {budget} bytes"
        )));
    }
    Ok(())
}

/// Places every frame on a transparent full-size canvas at its offset and converts its
/// delay to hundredths of a second.
fn assemble_frames(size: Size, frames: Vec<Frame>) -> OverlayResult<AnimatedImage> {
    let mut delays_cs = Vec::with_capacity(frames.len());
    let mut canvases = Vec::with_capacity(frames.len());
    for frame in frames {
        delays_cs.push(delay_centiseconds(frame.delay()));

        let (left, top) = (frame.left(), frame.top());
        let buf = frame.into_buffer();
        if buf.dimensions() == (size.width, size.height) && left == 0 && top == 0 {
            canvases.push(buf);
        } else {
            let mut canvas = RgbaImage::new(size.width, size.height);
            image::imageops::overlay(&mut canvas, &buf, i64::from(left), i64::from(top));
            canvases.push(canvas);
        }
    }

    AnimatedImage::from_straight_frames(size, canvases, Some(delays_cs))
}

/// Rounds to the nearest centisecond.
fn delay_centiseconds(delay: Delay) -> u32 {
    let (numer, denom) = delay.numer_denom_ms();
    let ms = if denom == 0 { 0 } else { numer / denom };
    ms.saturating_add(5) / 10
}

fn decode_still(bytes: &[u8], format: ImageFormat) -> OverlayResult<AnimatedImage> {
    let dyn_img = image::load_from_memory_with_format(bytes, format)
        .map_err(decode_err("still image"))?;
    let rgba = dyn_img.to_rgba8();
    let (w, h) = rgba.dimensions();
    AnimatedImage::from_straight_frames(Size::new(w, h), vec![rgba], None)
}

fn decode_err(what: &'static str) -> impl Fn(image::ImageError) -> OverlayError {
    move |e| OverlayError::decode(format!("{what}: {e}"))
}

fn premultiply_rgba8_in_place(rgba: &mut RgbaImage) {
    for px in rgba.pixels_mut() {
        let a = u16::from(px[3]);
        if a == 0 {
            px.0 = [0, 0, 0, 0];
            continue;
        }
        for c in 0..3 {
            px[c] = ((u16::from(px[c]) * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
