use crate::foundation::error::{OverlayError, OverlayResult};

/// Top-left screen position in pixels. May be negative transiently inside a motion tick.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Per-tick displacement in pixels.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Velocity {
    pub vx: i32,
    pub vy: i32,
}

impl Velocity {
    pub const fn new(vx: i32, vy: i32) -> Self {
        Self { vx, vy }
    }

    pub fn is_zero(self) -> bool {
        self.vx == 0 && self.vy == 0
    }
}

/// Pixel extent, used for both sprite and screen bounds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(self) -> Option<usize> {
        usize::try_from(self.width)
            .ok()?
            .checked_mul(usize::try_from(self.height).ok()?)
    }

    /// Parses `"1920x1080"` (also accepts `X` and `*` as separator).
    pub fn parse(s: &str) -> OverlayResult<Self> {
        let (w, h) = s
            .split_once(['x', 'X', '*'])
            .ok_or_else(|| OverlayError::config(format!("size '{s}' must look like WxH")))?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|e| OverlayError::config(format!("size '{s}' width: {e}")))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|e| OverlayError::config(format!("size '{s}' height: {e}")))?;
        Ok(Self { width, height })
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
