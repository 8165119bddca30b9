use std::{
    collections::{BTreeMap, VecDeque},
    time::{Duration, Instant},
};

use image::RgbaImage;

use crate::{
    foundation::{
        core::{Point, Size},
        error::{OverlayError, OverlayResult},
        hotkey::Hotkey,
    },
    host::{HostEvent, HotkeyId, OverlayStyle, TimerId, WindowHost},
    render::{
        buffer::PixelBuffer,
        presenter::{BlendFunction, LayeredSurface},
    },
};

const HISTORY_LIMIT: usize = 4096;
const FIRST_HOTKEY_ID: u32 = 1001;

/// Time source for the headless event loop.
#[derive(Clone, Copy, Debug)]
pub enum HostClock {
    /// Time jumps straight to the next deadline. Deterministic; used by tests.
    Virtual,
    /// Sleeps until each deadline on the wall clock.
    Realtime,
}

/// Things that happen to the host at a given time, as if caused by the user or system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptedSignal {
    /// The user presses a key combination. Delivered only if it is registered.
    PressHotkey(Hotkey),
    /// The surface is destroyed.
    DestroySurface,
    /// The surface silently stops accepting frames (no event is delivered).
    LoseSurface,
    /// A lost surface comes back.
    RestoreSurface,
    /// The window is asked to close.
    Close,
}

/// One accepted frame submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Host time of the submission.
    pub at: Duration,
    pub top_left: Point,
}

/// In-memory layered surface. Becomes visible on its first accepted frame.
#[derive(Debug)]
pub struct HeadlessSurface {
    alive: bool,
    visible: bool,
    now: Duration,
    fail_next: u32,
    attempts: u64,
    history: VecDeque<Presentation>,
    accepted: u64,
    capture: bool,
    last_frame: Option<RgbaImage>,
}

impl HeadlessSurface {
    fn new() -> Self {
        Self {
            alive: true,
            visible: false,
            now: Duration::ZERO,
            fail_next: 0,
            attempts: 0,
            history: VecDeque::new(),
            accepted: 0,
            capture: false,
            last_frame: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Total submissions, accepted or not.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Accepted submissions.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Most recent accepted submissions, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Presentation> {
        self.history.iter()
    }

    pub fn last_position(&self) -> Option<Point> {
        self.history.back().map(|p| p.top_left)
    }

    /// Straight-alpha copy of the last accepted frame, when capture is enabled.
    pub fn last_frame(&self) -> Option<&RgbaImage> {
        self.last_frame.as_ref()
    }

    /// Rejects the next `n` submissions while staying alive.
    pub fn fail_next(&mut self, n: u32) {
        self.fail_next = n;
    }
}

impl LayeredSurface for HeadlessSurface {
    fn update_layered(
        &mut self,
        pixels: &PixelBuffer,
        top_left: Point,
        blend: BlendFunction,
    ) -> OverlayResult<()> {
        self.attempts += 1;
        if !self.alive {
            return Err(OverlayError::present("surface is gone"));
        }
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(OverlayError::present("surface busy"));
        }
        if !blend.per_pixel_alpha || blend.constant_alpha != 255 {
            tracing::debug!(?blend, "headless surface ignores non-default blend");
        }

        self.visible = true;
        self.accepted += 1;
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(Presentation {
            at: self.now,
            top_left,
        });
        if self.capture {
            self.last_frame = Some(pixels.to_straight_rgba8());
        }
        Ok(())
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

#[derive(Clone, Copy, Debug)]
struct ArmedTimer {
    period: Duration,
    due: Duration,
}

/// In-process [`WindowHost`]: timers, hotkeys and surface signals without a real window.
#[derive(Debug)]
pub struct HeadlessHost {
    screen: Size,
    clock: HostClock,
    started: Instant,
    now: Duration,
    timers: BTreeMap<TimerId, ArmedTimer>,
    script: Vec<(Duration, ScriptedSignal)>,
    hotkeys: BTreeMap<HotkeyId, Hotkey>,
    next_hotkey: u32,
    style: OverlayStyle,
    surface: HeadlessSurface,
    notifications: Vec<(String, String)>,
    refuse_style: bool,
    refuse_hotkeys: bool,
    events: u64,
}

impl HeadlessHost {
    pub fn new(screen: Size, clock: HostClock) -> Self {
        Self {
            screen,
            clock,
            started: Instant::now(),
            now: Duration::ZERO,
            timers: BTreeMap::new(),
            script: Vec::new(),
            hotkeys: BTreeMap::new(),
            next_hotkey: FIRST_HOTKEY_ID,
            style: OverlayStyle::empty(),
            surface: HeadlessSurface::new(),
            notifications: Vec::new(),
            refuse_style: false,
            refuse_hotkeys: false,
            events: 0,
        }
    }

    /// Schedules `signal` at host time `at`.
    pub fn schedule(&mut self, at: Duration, signal: ScriptedSignal) -> &mut Self {
        let idx = self.script.partition_point(|(t, _)| *t <= at);
        self.script.insert(idx, (at, signal));
        self
    }

    /// Keep a straight-alpha copy of the last accepted frame.
    pub fn capture_frames(&mut self, on: bool) -> &mut Self {
        self.surface.capture = on;
        self
    }

    /// Make [`WindowHost::apply_overlay_style`] fail.
    pub fn refuse_style(&mut self) -> &mut Self {
        self.refuse_style = true;
        self
    }

    /// Make [`WindowHost::register_hotkey`] fail.
    pub fn refuse_hotkeys(&mut self) -> &mut Self {
        self.refuse_hotkeys = true;
        self
    }

    pub fn set_screen(&mut self, screen: Size) {
        self.screen = screen;
    }

    /// Host time elapsed since construction.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn style(&self) -> OverlayStyle {
        self.style
    }

    pub fn is_timer_armed(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn timer_period(&self, id: TimerId) -> Option<Duration> {
        self.timers.get(&id).map(|t| t.period)
    }

    pub fn registered_hotkeys(&self) -> impl Iterator<Item = (&HotkeyId, &Hotkey)> {
        self.hotkeys.iter()
    }

    pub fn headless_surface(&self) -> &HeadlessSurface {
        &self.surface
    }

    pub fn headless_surface_mut(&mut self) -> &mut HeadlessSurface {
        &mut self.surface
    }

    /// Error notifications shown so far, as `(title, message)`.
    pub fn notifications(&self) -> &[(String, String)] {
        &self.notifications
    }

    /// Events delivered so far.
    pub fn events_delivered(&self) -> u64 {
        self.events
    }

    fn advance_to(&mut self, t: Duration) {
        if t <= self.now {
            return;
        }
        if let HostClock::Realtime = self.clock {
            let elapsed = self.started.elapsed();
            if t > elapsed {
                std::thread::sleep(t - elapsed);
            }
        }
        self.now = t;
        self.surface.now = t;
    }

    fn next_timer(&self) -> Option<(Duration, TimerId)> {
        self.timers
            .iter()
            .map(|(id, t)| (t.due, *id))
            .min()
    }

    fn apply_signal(&mut self, signal: ScriptedSignal) -> Option<HostEvent> {
        match signal {
            ScriptedSignal::PressHotkey(hk) => {
                let id = self
                    .hotkeys
                    .iter()
                    .find_map(|(id, registered)| (*registered == hk).then_some(*id));
                if id.is_none() {
                    tracing::debug!(%hk, "unregistered hotkey pressed");
                }
                id.map(HostEvent::Hotkey)
            }
            ScriptedSignal::DestroySurface => {
                self.surface.alive = false;
                Some(HostEvent::SurfaceDestroyed)
            }
            ScriptedSignal::LoseSurface => {
                self.surface.alive = false;
                None
            }
            ScriptedSignal::RestoreSurface => {
                self.surface.alive = true;
                Some(HostEvent::SurfaceRestored)
            }
            ScriptedSignal::Close => Some(HostEvent::CloseRequested),
        }
    }
}

impl WindowHost for HeadlessHost {
    fn surface(&mut self) -> &mut dyn LayeredSurface {
        &mut self.surface
    }

    fn apply_overlay_style(&mut self, style: OverlayStyle) -> OverlayResult<()> {
        if self.refuse_style {
            return Err(OverlayError::host("overlay style rejected"));
        }
        self.style |= style;
        Ok(())
    }

    fn register_hotkey(&mut self, hotkey: Hotkey) -> OverlayResult<HotkeyId> {
        if self.refuse_hotkeys || self.hotkeys.values().any(|h| *h == hotkey) {
            return Err(OverlayError::host(format!("hotkey {hotkey} is already taken")));
        }
        let id = HotkeyId(self.next_hotkey);
        self.next_hotkey += 1;
        self.hotkeys.insert(id, hotkey);
        Ok(id)
    }

    fn unregister_hotkey(&mut self, id: HotkeyId) -> OverlayResult<()> {
        self.hotkeys
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| OverlayError::host(format!("hotkey {id:?} is not registered")))
    }

    fn screen_bounds(&self) -> Size {
        self.screen
    }

    fn set_timer(&mut self, id: TimerId, period: Duration) {
        // A zero period would starve every other signal.
        let period = period.max(Duration::from_millis(1));
        self.timers.insert(
            id,
            ArmedTimer {
                period,
                due: self.now + period,
            },
        );
    }

    fn kill_timer(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    fn notify_error(&mut self, title: &str, message: &str) {
        tracing::error!(title, message, "operator notification");
        self.notifications
            .push((title.to_string(), message.to_string()));
    }

    fn next_event(&mut self) -> Option<HostEvent> {
        loop {
            let timer = self.next_timer();
            let scripted = self.script.first().map(|(t, _)| *t);

            let take_script = match (scripted, timer) {
                (None, None) => return None,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (Some(s), Some((t, _))) => s <= t,
            };

            if take_script {
                let (at, signal) = self.script.remove(0);
                self.advance_to(at);
                if let Some(ev) = self.apply_signal(signal) {
                    self.events += 1;
                    return Some(ev);
                }
                continue;
            }

            let Some((due, id)) = timer else {
                return None;
            };
            self.advance_to(due);
            if let Some(t) = self.timers.get_mut(&id) {
                t.due += t.period;
                if t.due <= self.now {
                    t.due = self.now + t.period;
                }
            }
            self.events += 1;
            return Some(HostEvent::Timer(id));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/headless.rs"]
mod tests;
