//! Mote Metrics - frame timing for the particle host
//!
//! Zero-cost when the `metrics` feature is off: the types below collapse
//! into no-op stubs with the same API.
//!
//! # Usage
//!
//! ```ignore
//! use mote_metrics::FrameTimer;
//!
//! let mut timer = FrameTimer::new(120);
//! timer.record_interval(dt);
//! timer.begin();
//! // ... update and render ...
//! timer.end();
//! tracing::info!(fps = timer.fps(), "frame stats");
//! ```

#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod ring_buffer;

#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;

/// Execute code only when the calling crate enables its `metrics` feature
#[macro_export]
macro_rules! metrics {
    ($($tt:tt)*) => {
        #[cfg(feature = "metrics")]
        {
            $($tt)*
        }
    };
}

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn record_interval(&mut self, _dt: std::time::Duration) {}
    pub fn begin(&mut self) {}
    pub fn end(&mut self) {}
    pub fn fps(&self) -> f64 { 0.0 }
    pub fn frame_time_ms(&self) -> f64 { 0.0 }
    pub fn frame_time_range_ms(&self) -> (f64, f64) { (0.0, 0.0) }
}
