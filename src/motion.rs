use std::time::Duration;

use crate::foundation::core::{Point, Size, Velocity};

/// Sprite position, per-tick velocity and sprite size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionState {
    pub position: Point,
    pub velocity: Velocity,
    pub size: Size,
}

/// Which axes reflected on a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bounce {
    pub x: bool,
    pub y: bool,
}

impl MotionState {
    pub fn new(position: Point, velocity: Velocity, size: Size) -> Self {
        Self {
            position,
            velocity,
            size,
        }
    }

    /// Moves by one velocity step and reflects off the edges of `bounds`.
    ///
    /// Each axis is handled independently, so a corner hit flips both. Only the sign of a
    /// velocity component ever changes. A sprite larger than the screen on some axis is
    /// pinned to 0 on that axis.
    pub fn tick(self, bounds: Size) -> (Self, Bounce) {
        let (x, vx, bx) = step_axis(
            self.position.x,
            self.velocity.vx,
            self.size.width,
            bounds.width,
        );
        let (y, vy, by) = step_axis(
            self.position.y,
            self.velocity.vy,
            self.size.height,
            bounds.height,
        );
        (
            Self {
                position: Point::new(x, y),
                velocity: Velocity::new(vx, vy),
                size: self.size,
            },
            Bounce { x: bx, y: by },
        )
    }
}

fn step_axis(pos: i32, vel: i32, size: u32, bound: u32) -> (i32, i32, bool) {
    let mut p = i64::from(pos) + i64::from(vel);
    let mut v = vel;
    let mut bounced = false;

    if p < 0 {
        p = 0;
        v = v.saturating_neg();
        bounced = true;
    }
    let max = (i64::from(bound) - i64::from(size)).max(0);
    if p > max {
        p = max;
        v = v.saturating_neg();
        bounced = true;
    }
    (i32::try_from(p).unwrap_or(i32::MAX), v, bounced)
}

/// Fixed-period driver around [`MotionState`].
#[derive(Clone, Debug)]
pub struct MotionEngine {
    state: MotionState,
    interval: Duration,
    running: bool,
    ticks: u64,
}

impl MotionEngine {
    pub fn new(state: MotionState, interval: Duration) -> Self {
        Self {
            state,
            interval,
            running: false,
            ticks: 0,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn position(&self) -> Point {
        self.state.position
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Replaces the sprite size, e.g. once the asset dimensions are known.
    pub fn set_size(&mut self, size: Size) {
        self.state.size = size;
    }

    /// Returns the period to arm the host timer with.
    pub fn start(&mut self) -> Duration {
        self.running = true;
        self.interval
    }

    /// Returns true if the engine was running.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Advances one step. `None` when stopped.
    pub fn tick(&mut self, bounds: Size) -> Option<Bounce> {
        if !self.running {
            return None;
        }
        let (next, bounce) = self.state.tick(bounds);
        if bounce.x || bounce.y {
            tracing::trace!(?bounce, position = ?next.position, "bounced");
        }
        self.state = next;
        self.ticks += 1;
        Some(bounce)
    }
}

#[cfg(test)]
#[path = "../tests/unit/motion/engine.rs"]
mod tests;
