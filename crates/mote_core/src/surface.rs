//! Drawing surfaces
//!
//! A [`Surface`] is the host-owned area the field paints into. Its
//! [`DrawContext`] is the 2D API; a surface that cannot provide one is the
//! "rendering context unavailable" case and the field renders nothing.

use crate::config::Rgba;
use crate::math::{Extent, Vec2};

/// Minimal 2D drawing API, modelled on an immediate-mode canvas.
pub trait DrawContext {
    /// Make the whole surface transparent.
    fn clear(&mut self);

    /// Set the color used by subsequent [`fill_disc`](Self::fill_disc) calls.
    fn set_fill(&mut self, color: Rgba);

    fn fill_disc(&mut self, center: Vec2, radius: f32);
}

pub trait Surface {
    /// Resize the drawable area. Existing content may be discarded.
    fn set_extent(&mut self, extent: Extent);

    /// The drawing context, or `None` if the surface cannot be drawn to.
    fn context(&mut self) -> Option<&mut dyn DrawContext>;
}

/// One recorded drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCall {
    Clear,
    SetFill(Rgba),
    Disc { center: Vec2, radius: f32 },
}

/// Headless surface that records the commands of the latest frame.
///
/// `clear` starts a new frame, so memory stays bounded by one frame's
/// worth of calls no matter how long the host runs.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    extent: Extent,
    calls: Vec<DrawCall>,
    available: bool,
    resizes: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            extent: Extent::ZERO,
            calls: Vec::new(),
            available: true,
            resizes: 0,
        }
    }

    /// A surface whose drawing context cannot be acquired.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Number of `set_extent` calls received.
    pub fn resizes(&self) -> usize {
        self.resizes
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Discs drawn since the last clear.
    pub fn discs(&self) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        self.calls.iter().filter_map(|call| match *call {
            DrawCall::Disc { center, radius } => Some((center, radius)),
            _ => None,
        })
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawContext for RecordingSurface {
    fn clear(&mut self) {
        self.calls.clear();
        self.calls.push(DrawCall::Clear);
    }

    fn set_fill(&mut self, color: Rgba) {
        self.calls.push(DrawCall::SetFill(color));
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32) {
        self.calls.push(DrawCall::Disc { center, radius });
    }
}

impl Surface for RecordingSurface {
    fn set_extent(&mut self, extent: Extent) {
        self.extent = extent;
        self.resizes += 1;
        self.calls.clear();
    }

    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        if self.available {
            Some(self)
        } else {
            None
        }
    }
}
