//! bouncegif renders one animated image as a click-through, always-on-top overlay that
//! drifts around the screen and bounces off its edges.
//!
//! # Pipeline overview
//!
//! 1. **Fetch**: an [`AssetFetcher`] turns a path or URL into a readable local file.
//! 2. **Decode**: [`load`] produces an [`AnimatedImage`] (premultiplied frames) and
//!    [`durations_for`] its [`DurationTable`].
//! 3. **Composite**: the [`Compositor`] clears its [`PixelBuffer`] and draws the frame
//!    selected by the [`AnimationClock`].
//! 4. **Present**: the [`Presenter`] submits buffer and [`MotionEngine`] position to a
//!    [`LayeredSurface`] in one call.
//!
//! [`Overlay`] owns all of it and reacts to the [`HostEvent`]s a [`WindowHost`] delivers.
//! Everything runs on the host's event thread; there is no locking and no `unsafe`.
#![forbid(unsafe_code)]

mod animation;
mod assets;
mod foundation;
mod host;
mod lifecycle;
mod motion;
mod render;

pub use animation::clock::{AnimationClock, ClockPhase, ClockTick};
pub use animation::durations::{DEFAULT_FRAME_DELAY_MS, DurationTable, MIN_FRAME_DELAY_MS};
pub use assets::decode::{AnimatedImage, MAX_DECODED_BYTES, decode_animated, durations_for, load};
pub use assets::fetch::{AssetFetcher, AutoFetcher, FetchedAsset, LocalFileFetcher, is_remote};
#[cfg(feature = "http")]
pub use assets::fetch::HttpFetcher;
pub use foundation::config::{MAX_SPEED, OverlayConfig};
pub use foundation::core::{Point, Size, Velocity};
pub use foundation::error::{OverlayError, OverlayResult};
pub use foundation::hotkey::{Hotkey, Modifiers};
pub use host::{
    HeadlessHost, HeadlessSurface, HostClock, HostEvent, HotkeyId, OverlayStyle, Presentation,
    ScriptedSignal, TimerId, WindowHost,
};
pub use lifecycle::{APP_TITLE, ExitReason, Flow, Overlay, OverlayStats, run};
pub use motion::{Bounce, MotionEngine, MotionState};
pub use render::blend::{PremulRgba8, over, unpremultiply};
pub use render::buffer::{PixelBuffer, pack_argb, unpack_argb};
pub use render::compositor::Compositor;
pub use render::presenter::{BlendFunction, LayeredSurface, PresentOutcome, Presenter};
