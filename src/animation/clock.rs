use std::time::Duration;

use crate::{
    animation::durations::{DEFAULT_FRAME_DELAY_MS, DurationTable},
    foundation::error::{OverlayError, OverlayResult},
};

/// Lifecycle of the frame-advance timer for one loaded asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockPhase {
    /// No asset loaded yet.
    Idle,
    /// A tick is scheduled; `active_frame` is the frame currently on screen.
    Running { active_frame: usize },
    /// Shut down. Terminal until [`AnimationClock::reset`].
    Stopped,
}

/// Output of one Running transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockTick {
    /// Frame that just became active and must be composited.
    pub frame_index: usize,
    /// Delay until the next tick; the duration of `frame_index`.
    pub next_delay: Duration,
}

/// Variable-period, self-rescheduling frame clock.
///
/// Every transition yields the delay for the following tick so the host timer can be
/// re-armed with it. The delay is always the duration of the frame that has *just*
/// become active, which means the first frame is shown for `table[0]` and each later
/// frame for its own entry.
#[derive(Clone, Debug)]
pub struct AnimationClock {
    phase: ClockPhase,
    table: DurationTable,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationClock {
    pub fn new() -> Self {
        Self {
            phase: ClockPhase::Idle,
            table: DurationTable::uniform(DEFAULT_FRAME_DELAY_MS, 0),
        }
    }

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, ClockPhase::Running { .. })
    }

    pub fn active_frame(&self) -> Option<usize> {
        match self.phase {
            ClockPhase::Running { active_frame } => Some(active_frame),
            _ => None,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.table.len()
    }

    /// Idle -> Running at frame 0. Returns the delay for the first tick.
    pub fn start(&mut self, table: DurationTable) -> OverlayResult<Duration> {
        if self.phase != ClockPhase::Idle {
            return Err(OverlayError::animation(format!(
                "animation clock can only start from Idle (currently {:?})",
                self.phase
            )));
        }
        let first = if table.is_empty() {
            Duration::from_millis(u64::from(DEFAULT_FRAME_DELAY_MS))
        } else {
            table.delay(0)
        };
        self.table = table;
        self.phase = ClockPhase::Running { active_frame: 0 };
        Ok(first)
    }

    /// Advances to `(active + 1) mod frame_count`. Returns `None` unless Running.
    pub fn tick(&mut self) -> Option<ClockTick> {
        let ClockPhase::Running { active_frame } = self.phase else {
            return None;
        };
        let n = self.table.len();
        let frame_index = if n == 0 { 0 } else { (active_frame + 1) % n };
        self.phase = ClockPhase::Running {
            active_frame: frame_index,
        };
        Some(ClockTick {
            frame_index,
            next_delay: self.table.delay(frame_index),
        })
    }

    /// Enters Stopped. Returns true if a tick was pending (the clock was Running).
    /// Calling it again is a no-op.
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        self.phase = ClockPhase::Stopped;
        was_running
    }

    /// Back to Idle, dropping the duration table. Used before loading a new asset.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
