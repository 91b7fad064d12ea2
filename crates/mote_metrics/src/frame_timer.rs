//! Frame timing
//!
//! Tracks two things per frame: the interval between frames (what the
//! viewer sees as FPS) and the time spent doing frame work.

use super::ring_buffer::RingBuffer;
use std::time::{Duration, Instant};

pub struct FrameTimer {
    work_start: Option<Instant>,
    work: RingBuffer<Duration>,
    intervals: RingBuffer<Duration>,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            work_start: None,
            work: RingBuffer::new(capacity),
            intervals: RingBuffer::new(capacity),
        }
    }

    /// Record the time since the previous frame.
    pub fn record_interval(&mut self, dt: Duration) {
        self.intervals.push(dt);
    }

    pub fn begin(&mut self) {
        self.work_start = Some(Instant::now());
    }

    pub fn end(&mut self) {
        if let Some(start) = self.work_start.take() {
            self.work.push(start.elapsed());
        }
    }

    pub fn fps(&self) -> f64 {
        let avg = self.intervals.average().as_secs_f64();
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }

    /// Average time spent between `begin` and `end`.
    pub fn frame_time_ms(&self) -> f64 {
        self.work.average().as_secs_f64() * 1000.0
    }

    pub fn frame_time_range_ms(&self) -> (f64, f64) {
        let (min, max) = self.work.min_max();
        (min.as_secs_f64() * 1000.0, max.as_secs_f64() * 1000.0)
    }
}
