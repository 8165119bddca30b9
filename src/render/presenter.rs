use crate::{
    foundation::{core::Point, error::OverlayResult},
    render::buffer::PixelBuffer,
};

/// How the surface combines submitted pixels with whatever is beneath it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendFunction {
    /// Constant alpha applied on top of per-pixel alpha; 255 passes per-pixel alpha through.
    pub constant_alpha: u8,
    /// Use the buffer's own (premultiplied) alpha channel.
    pub per_pixel_alpha: bool,
}

impl BlendFunction {
    /// Source-over with per-pixel alpha at full constant alpha.
    pub const PER_PIXEL_OVER: BlendFunction = BlendFunction {
        constant_alpha: 255,
        per_pixel_alpha: true,
    };
}

/// A visible, alpha-blended surface whose content and position are replaced together.
pub trait LayeredSurface {
    /// Shows `pixels` with its top-left corner at `top_left` in screen coordinates.
    fn update_layered(
        &mut self,
        pixels: &PixelBuffer,
        top_left: Point,
        blend: BlendFunction,
    ) -> OverlayResult<()>;

    /// False once the surface is gone for good (destroyed, device lost).
    fn is_alive(&self) -> bool;
}

/// Result of one [`Presenter::present`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentOutcome {
    Presented,
    /// The surface rejected this frame; later frames will be attempted.
    Skipped,
    /// The surface is gone; nothing is submitted until [`Presenter::resume`].
    Suppressed,
}

/// Best-effort submission of composited frames.
#[derive(Clone, Debug, Default)]
pub struct Presenter {
    suspended: bool,
    consecutive_failures: u32,
    presented: u64,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn present(
        &mut self,
        surface: &mut dyn LayeredSurface,
        buffer: &PixelBuffer,
        top_left: Point,
    ) -> PresentOutcome {
        if self.suspended {
            return PresentOutcome::Suppressed;
        }

        match surface.update_layered(buffer, top_left, BlendFunction::PER_PIXEL_OVER) {
            Ok(()) => {
                if self.consecutive_failures > 0 {
                    tracing::debug!(
                        failures = self.consecutive_failures,
                        "surface accepted frame again"
                    );
                }
                self.consecutive_failures = 0;
                self.presented += 1;
                PresentOutcome::Presented
            }
            Err(err) => {
                self.consecutive_failures += 1;
                tracing::warn!(%err, failures = self.consecutive_failures, "present failed");
                if !surface.is_alive() {
                    tracing::warn!("surface is gone; suspending presents");
                    self.suspended = true;
                }
                PresentOutcome::Skipped
            }
        }
    }

    /// Re-enables presenting after the host re-created the surface.
    pub fn resume(&mut self) {
        self.suspended = false;
        self.consecutive_failures = 0;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Number of frames the surface accepted.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/presenter.rs"]
mod tests;
