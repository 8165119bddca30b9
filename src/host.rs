//! Boundary to the windowing system.
//!
//! The engine never creates windows or runs a message pump itself. A [`WindowHost`]
//! provides the presentable surface, serialises timer/hotkey/surface signals into a
//! single event stream and applies the overlay window properties. [`HeadlessHost`] is
//! the in-process implementation used by the CLI and the tests.

pub(crate) mod headless;

use std::time::Duration;

use crate::{
    foundation::{core::Size, error::OverlayResult, hotkey::Hotkey},
    render::presenter::LayeredSurface,
};

/// The two independent tick sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerId {
    /// Variable-period frame advance.
    Animation,
    /// Fixed-period motion step.
    Motion,
}

/// Handle returned by [`WindowHost::register_hotkey`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HotkeyId(pub u32);

/// Signals delivered by the host's event loop, one at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    Timer(TimerId),
    Hotkey(HotkeyId),
    /// The surface was destroyed; the overlay must shut down.
    SurfaceDestroyed,
    /// The surface was re-created after a loss and can be presented to again.
    SurfaceRestored,
    /// The user or the system asked the window to close.
    CloseRequested,
}

bitflags::bitflags! {
    /// Window properties that make the surface behave as an overlay.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct OverlayStyle: u8 {
        /// Pointer input passes through to whatever is beneath.
        const CLICK_THROUGH = 1 << 0;
        /// Stays above normally-ordered windows.
        const TOPMOST       = 1 << 1;
        /// Hidden from the taskbar and task switcher.
        const NO_TASKBAR    = 1 << 2;
    }
}

impl OverlayStyle {
    pub fn overlay() -> Self {
        Self::CLICK_THROUGH | Self::TOPMOST | Self::NO_TASKBAR
    }
}

/// Everything the engine needs from the windowing system.
pub trait WindowHost {
    fn surface(&mut self) -> &mut dyn LayeredSurface;

    fn apply_overlay_style(&mut self, style: OverlayStyle) -> OverlayResult<()>;

    fn register_hotkey(&mut self, hotkey: Hotkey) -> OverlayResult<HotkeyId>;

    fn unregister_hotkey(&mut self, id: HotkeyId) -> OverlayResult<()>;

    /// Current size of the screen the surface lives on.
    fn screen_bounds(&self) -> Size;

    /// Arms `id` to fire every `period`, replacing any previous arming of the same id.
    fn set_timer(&mut self, id: TimerId, period: Duration);

    /// Disarms `id`. Returns whether it was armed.
    fn kill_timer(&mut self, id: TimerId) -> bool;

    /// Shows an error to the operator.
    fn notify_error(&mut self, title: &str, message: &str);

    /// Blocks until the next signal. `None` once the host's loop has ended.
    fn next_event(&mut self) -> Option<HostEvent>;
}

pub use headless::{HeadlessHost, HeadlessSurface, HostClock, Presentation, ScriptedSignal};
