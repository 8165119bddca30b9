//! Startup, event dispatch and teardown of one overlay.

use crate::{
    animation::{
        clock::{AnimationClock, ClockPhase},
        durations::DurationTable,
    },
    assets::{
        decode::{self, AnimatedImage},
        fetch::{AssetFetcher, FetchedAsset},
    },
    foundation::{
        config::OverlayConfig,
        error::{OverlayError, OverlayResult},
    },
    host::{HostEvent, HotkeyId, OverlayStyle, TimerId, WindowHost},
    motion::{MotionEngine, MotionState},
    render::{
        compositor::Compositor,
        presenter::{PresentOutcome, Presenter},
    },
};

/// Title used for operator-facing error notifications.
pub const APP_TITLE: &str = "bouncegif";

/// Whether the event loop should keep going after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Why a running overlay ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    Hotkey,
    SurfaceDestroyed,
    CloseRequested,
    /// The host's event loop ran dry.
    HostClosed,
}

/// Counters describing what the overlay has drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlayStats {
    pub renders: u64,
    pub presented: u64,
    pub skipped: u64,
    pub suppressed: u64,
}

/// Owning context for one overlay: asset, frame store, compositor, presenter and both
/// clocks. Every handler runs on the host's single event thread.
pub struct Overlay<'h, H: WindowHost> {
    host: &'h mut H,
    asset: Option<FetchedAsset>,
    image: Option<AnimatedImage>,
    compositor: Compositor,
    presenter: Presenter,
    clock: AnimationClock,
    motion: MotionEngine,
    hotkey: Option<HotkeyId>,
    stopped: bool,
    exit: Option<ExitReason>,
    stats: OverlayStats,
}

impl<'h, H: WindowHost> Overlay<'h, H> {
    /// Runs the startup sequence. On failure everything acquired so far is released, the
    /// operator is notified through the host and the error is returned.
    #[tracing::instrument(skip_all, fields(source = %config.source))]
    pub fn start(
        host: &'h mut H,
        fetcher: &mut dyn AssetFetcher,
        config: &OverlayConfig,
    ) -> OverlayResult<Self> {
        let motion = MotionEngine::new(
            MotionState::new(config.start_position, config.velocity, config.fallback_size),
            config.motion_interval(),
        );
        let mut overlay = Self {
            host,
            asset: None,
            image: None,
            compositor: Compositor::new(),
            presenter: Presenter::new(),
            clock: AnimationClock::new(),
            motion,
            hotkey: None,
            stopped: false,
            exit: None,
            stats: OverlayStats::default(),
        };

        match overlay.startup(fetcher, config) {
            Ok(()) => {
                tracing::info!(
                    size = %overlay.motion.state().size,
                    frames = overlay.clock.frame_count(),
                    "overlay running"
                );
                Ok(overlay)
            }
            Err(err) => {
                tracing::error!(%err, "startup failed");
                overlay.shutdown();
                let message = format!("{}\n\n{err}", startup_headline(&err));
                overlay.host.notify_error(APP_TITLE, &message);
                Err(err)
            }
        }
    }

    fn startup(
        &mut self,
        fetcher: &mut dyn AssetFetcher,
        config: &OverlayConfig,
    ) -> OverlayResult<()> {
        config.validate()?;
        let hotkey = config.exit_hotkey()?;

        let asset = fetcher.fetch(&config.source)?;
        let image = decode::load(asset.path());
        self.asset = Some(asset);
        let image = image?;
        let durations = decode::durations_for(&image);
        let size = image.size();
        self.image = Some(image);

        self.compositor.ensure_size(size)?;

        self.host.apply_overlay_style(OverlayStyle::overlay())?;
        self.hotkey = Some(self.host.register_hotkey(hotkey)?);
        tracing::debug!(%hotkey, "exit hotkey registered");

        self.start_clock(durations)?;

        self.motion.set_size(size);
        let period = self.motion.start();
        self.host.set_timer(TimerId::Motion, period);

        self.redraw(0);
        Ok(())
    }

    fn start_clock(&mut self, durations: DurationTable) -> OverlayResult<()> {
        let first = self.clock.start(durations)?;
        self.host.set_timer(TimerId::Animation, first);
        Ok(())
    }

    /// Dispatches one host signal.
    pub fn handle_event(&mut self, event: HostEvent) -> Flow {
        if self.stopped {
            return Flow::Exit;
        }
        match event {
            HostEvent::Timer(TimerId::Animation) => self.on_animation_tick(),
            HostEvent::Timer(TimerId::Motion) => self.on_motion_tick(),
            HostEvent::Hotkey(id) if Some(id) == self.hotkey => {
                tracing::info!("exit hotkey pressed");
                return self.stop_with(ExitReason::Hotkey);
            }
            HostEvent::Hotkey(id) => tracing::debug!(?id, "ignoring foreign hotkey"),
            HostEvent::SurfaceDestroyed => return self.stop_with(ExitReason::SurfaceDestroyed),
            HostEvent::CloseRequested => return self.stop_with(ExitReason::CloseRequested),
            HostEvent::SurfaceRestored => {
                self.presenter.resume();
                if let Some(idx) = self.clock.active_frame() {
                    self.redraw(idx);
                }
            }
        }
        Flow::Continue
    }

    fn stop_with(&mut self, reason: ExitReason) -> Flow {
        self.exit = Some(reason);
        self.shutdown();
        Flow::Exit
    }

    fn on_animation_tick(&mut self) {
        let Some(tick) = self.clock.tick() else {
            return;
        };
        self.host.set_timer(TimerId::Animation, tick.next_delay);
        self.redraw(tick.frame_index);
    }

    fn on_motion_tick(&mut self) {
        let bounds = self.host.screen_bounds();
        if self.motion.tick(bounds).is_none() {
            return;
        }
        if let Some(idx) = self.clock.active_frame() {
            self.redraw(idx);
        }
    }

    fn redraw(&mut self, frame_index: usize) {
        let Some(image) = self.image.as_mut() else {
            return;
        };
        if let Err(err) = self.compositor.render(image, frame_index) {
            tracing::warn!(%err, frame_index, "render failed");
            return;
        }
        self.stats.renders += 1;

        let Some(buffer) = self.compositor.buffer() else {
            return;
        };
        match self
            .presenter
            .present(self.host.surface(), buffer, self.motion.position())
        {
            PresentOutcome::Presented => self.stats.presented += 1,
            PresentOutcome::Skipped => self.stats.skipped += 1,
            PresentOutcome::Suppressed => self.stats.suppressed += 1,
        }
    }

    /// Replaces the asset wholesale. If fetching, decoding or allocating fails the old
    /// asset, image and buffer keep running untouched. The buffer is only reallocated
    /// when the new image has different dimensions.
    pub fn reload(
        &mut self,
        fetcher: &mut dyn AssetFetcher,
        locator: &str,
    ) -> OverlayResult<()> {
        if self.stopped {
            return Err(OverlayError::animation("overlay is shut down"));
        }
        let asset = fetcher.fetch(locator)?;
        let image = decode::load(asset.path())?;
        let durations = decode::durations_for(&image);
        let size = image.size();
        self.compositor.resize(size)?;

        self.host.kill_timer(TimerId::Animation);
        self.clock.reset();
        self.image = Some(image);
        self.motion.set_size(size);
        if let Some(old) = self.asset.replace(asset) {
            if let Err(err) = old.release() {
                tracing::warn!(%err, "could not remove previous asset");
            }
        }
        self.start_clock(durations)?;
        self.redraw(0);
        Ok(())
    }

    /// Tears everything down in reverse acquisition order. Every step runs even if an
    /// earlier one fails; failures are logged and returned. Idempotent.
    pub fn shutdown(&mut self) -> Vec<OverlayError> {
        let mut failures = Vec::new();
        if self.stopped {
            return failures;
        }
        self.stopped = true;

        self.clock.stop();
        self.host.kill_timer(TimerId::Animation);

        self.motion.stop();
        self.host.kill_timer(TimerId::Motion);

        if let Some(id) = self.hotkey.take() {
            if let Err(err) = self.host.unregister_hotkey(id) {
                failures.push(err);
            }
        }

        self.compositor.release();
        self.image = None;

        if let Some(asset) = self.asset.take() {
            if let Err(err) = asset.release() {
                failures.push(err);
            }
        }

        for err in &failures {
            tracing::warn!(%err, "teardown step failed");
        }
        tracing::debug!(failures = failures.len(), "overlay shut down");
        failures
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit
    }

    pub fn clock_phase(&self) -> ClockPhase {
        self.clock.phase()
    }

    pub fn motion_state(&self) -> MotionState {
        self.motion.state()
    }

    pub fn stats(&self) -> OverlayStats {
        self.stats
    }

    pub fn has_buffer(&self) -> bool {
        self.compositor.is_allocated()
    }

    pub fn asset(&self) -> Option<&FetchedAsset> {
        self.asset.as_ref()
    }

    pub fn image(&self) -> Option<&AnimatedImage> {
        self.image.as_ref()
    }

    pub fn host(&self) -> &H {
        &*self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut *self.host
    }
}

impl<H: WindowHost> Drop for Overlay<'_, H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn startup_headline(err: &OverlayError) -> &'static str {
    match err {
        OverlayError::Fetch(_) => "Failed to fetch the image.",
        OverlayError::Decode(_) => "The image could not be loaded.",
        OverlayError::Alloc(_) => "Failed to create the ARGB back buffer.",
        OverlayError::Config(_) => "The configuration is invalid.",
        OverlayError::Host(_) => "The window host refused the overlay.",
        _ => "The overlay could not start.",
    }
}

/// Starts an overlay on `host` and pumps its events until shutdown.
pub fn run<H: WindowHost>(
    host: &mut H,
    fetcher: &mut dyn AssetFetcher,
    config: &OverlayConfig,
) -> OverlayResult<ExitReason> {
    let mut overlay = Overlay::start(host, fetcher, config)?;
    let reason = loop {
        let Some(event) = overlay.host.next_event() else {
            break ExitReason::HostClosed;
        };
        if overlay.handle_event(event) == Flow::Exit {
            break overlay.exit_reason().unwrap_or(ExitReason::HostClosed);
        }
    };
    overlay.shutdown();
    tracing::info!(?reason, stats = ?overlay.stats(), "overlay exited");
    Ok(reason)
}

#[cfg(test)]
#[path = "../tests/unit/lifecycle/overlay.rs"]
mod tests;
