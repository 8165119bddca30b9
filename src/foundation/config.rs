use std::path::Path;

use anyhow::Context as _;

use crate::foundation::{
    core::{Point, Size, Velocity},
    error::{OverlayError, OverlayResult},
    hotkey::Hotkey,
};

/// Largest accepted velocity component, in pixels per motion tick.
pub const MAX_SPEED: u32 = 4096;

/// Runtime settings for one overlay. Every field has a default so an empty JSON object
/// (or no config file at all) is valid.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Local path or `http(s)://` URL of the animated image.
    pub source: String,
    pub start_position: Point,
    pub velocity: Velocity,
    /// Period of the motion tick.
    pub motion_interval_ms: u64,
    /// Exit hotkey, e.g. `"Ctrl+Alt+Q"`.
    pub hotkey: String,
    /// Sprite size used for motion until an image has been loaded.
    pub fallback_size: Size,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            source: "overlay.gif".to_string(),
            start_position: Point::new(500, 300),
            velocity: Velocity::new(6, 5),
            motion_interval_ms: 16,
            hotkey: Hotkey::EXIT_DEFAULT.to_string(),
            fallback_size: Size::new(320, 240),
        }
    }
}

impl OverlayConfig {
    pub fn from_json_str(s: &str) -> OverlayResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| OverlayError::config(format!("parse config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> OverlayResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> OverlayResult<()> {
        if self.source.trim().is_empty() {
            return Err(OverlayError::config("source must not be empty"));
        }
        if self.motion_interval_ms == 0 {
            return Err(OverlayError::config("motion_interval_ms must be > 0"));
        }
        if self.velocity.is_zero() {
            return Err(OverlayError::config("velocity must be non-zero on some axis"));
        }
        if self.velocity.vx.unsigned_abs() > MAX_SPEED || self.velocity.vy.unsigned_abs() > MAX_SPEED
        {
            return Err(OverlayError::config(format!(
                "velocity components must be within ±{MAX_SPEED} px/tick"
            )));
        }
        if self.fallback_size.is_empty() {
            return Err(OverlayError::config("fallback_size must be non-empty"));
        }
        self.exit_hotkey()?;
        Ok(())
    }

    pub fn exit_hotkey(&self) -> OverlayResult<Hotkey> {
        Hotkey::parse(&self.hotkey)
    }

    pub fn motion_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.motion_interval_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
