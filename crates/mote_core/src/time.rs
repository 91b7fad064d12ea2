//! Frame time
//!
//! Particle velocities are expressed per reference frame (60 Hz). Hosts
//! measure real elapsed time with [`FrameClock`] and the field scales its
//! step by how many reference frames that covers.

use std::time::{Duration, Instant};

/// One 60 Hz frame.
pub const REFERENCE_FRAME: Duration = Duration::from_micros(16_666); // ~16.666ms

/// Upper bound on the steps a single tick may advance.
pub const MAX_FRAME_STEPS: f32 = 4.0;

/// Number of reference frames covered by `dt`, clamped to `[0, MAX_FRAME_STEPS]`.
pub fn frame_steps(dt: Duration) -> f32 {
    (dt.as_secs_f32() / REFERENCE_FRAME.as_secs_f32()).clamp(0.0, MAX_FRAME_STEPS)
}

/// Wall clock tracker that turns redraw instants into frame deltas.
pub struct FrameClock {
    last: Option<Instant>,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: None,
            frame_count: 0,
        }
    }

    /// Record a frame at `now` and return the time since the previous one.
    ///
    /// The first frame after construction or [`reset`](Self::reset) reports
    /// exactly one reference frame.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let dt = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => REFERENCE_FRAME,
        };
        self.last = Some(now);
        self.frame_count += 1;
        dt
    }

    /// Forget the previous instant, e.g. after the host was suspended.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
