//! Software canvas
//!
//! RGBA8 pixel buffer with premultiplied alpha. Discs get a one pixel
//! anti-aliased edge and are composited source-over, like a 2D canvas
//! `arc` + `fill`.
//!
//! Drawing happens in logical units; `scale` is the device pixel ratio
//! applied when sizing the buffer and rasterizing.

use mote_core::glam::Vec2;
use mote_core::surface::{DrawContext, Surface};
use mote_core::{Extent, Rgba};

pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
    fill: Rgba,
    scale: f32,
    available: bool,
}

impl PixelCanvas {
    /// An empty canvas; the stage sizes it on mount.
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
            fill: Rgba::TRANSPARENT,
            scale: 1.0,
            available: true,
        }
    }

    /// A canvas whose drawing context cannot be acquired.
    pub fn detached() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Device pixels per logical unit. Non-positive or non-finite values
    /// fall back to 1.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA bytes, row-major, no padding.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    fn blend(&mut self, x: u32, y: u32, color: [f32; 4], coverage: f32) {
        let index = y as usize * self.width as usize + x as usize;
        let Some(dst) = self.pixels.get_mut(index) else {
            return;
        };
        let alpha = color[3] * coverage;
        let keep = 1.0 - alpha;
        for channel in 0..3 {
            let src = color[channel] * alpha * 255.0;
            dst[channel] = (src + dst[channel] as f32 * keep).round().min(255.0) as u8;
        }
        dst[3] = (alpha * 255.0 + dst[3] as f32 * keep).round().min(255.0) as u8;
    }
}

impl Default for PixelCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawContext for PixelCanvas {
    fn clear(&mut self) {
        self.pixels.fill([0, 0, 0, 0]);
    }

    fn set_fill(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32) {
        let (center, radius) = (center * self.scale, radius * self.scale);
        if !(radius > 0.0) || !center.is_finite() || self.pixels.is_empty() {
            return;
        }
        let color = self.fill.to_f32();
        if color[3] <= 0.0 {
            return;
        }

        // Pixels whose centers can receive any coverage.
        let reach = radius + 0.5;
        let x0 = (center.x - reach).floor().max(0.0) as u32;
        let y0 = (center.y - reach).floor().max(0.0) as u32;
        let x1 = ((center.x + reach).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((center.y + reach).ceil().max(0.0) as u32).min(self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (reach - sample.distance(center)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }
}

impl Surface for PixelCanvas {
    fn set_extent(&mut self, extent: Extent) {
        // float-to-int casts saturate, NaN becomes 0
        self.width = (extent.width * self.scale).max(0.0).ceil() as u32;
        self.height = (extent.height * self.scale).max(0.0).ceil() as u32;
        let len = (self.width as usize).saturating_mul(self.height as usize);
        self.pixels = vec![[0; 4]; len];
    }

    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        if self.available {
            Some(self)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(width: u32, height: u32) -> PixelCanvas {
        let mut canvas = PixelCanvas::new();
        canvas.set_extent(Extent::from_pixels(width, height));
        canvas
    }

    #[test]
    fn test_set_extent_allocates_transparent_pixels() {
        let canvas = canvas(4, 3);
        assert_eq!(canvas.width(), 4);
        assert_eq!(canvas.height(), 3);
        assert_eq!(canvas.as_bytes().len(), 4 * 3 * 4);
        assert!(canvas.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fractional_extent_rounds_up() {
        let mut canvas = PixelCanvas::new();
        canvas.set_extent(Extent::new(10.2, 0.5));
        assert_eq!((canvas.width(), canvas.height()), (11, 1));
    }

    #[test]
    fn test_opaque_disc_covers_center_not_corners() {
        let mut canvas = canvas(20, 20);
        canvas.set_fill(Rgba::opaque(255, 0, 0));
        canvas.fill_disc(Vec2::new(10.0, 10.0), 4.0);

        assert_eq!(canvas.pixel(10, 10), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(19, 19), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_translucent_fill_is_premultiplied() {
        let mut canvas = canvas(8, 8);
        canvas.set_fill(Rgba::new(200, 100, 0, 0.5));
        canvas.fill_disc(Vec2::new(4.0, 4.0), 3.0);
        assert_eq!(canvas.pixel(4, 4), Some([100, 50, 0, 128]));
    }

    #[test]
    fn test_overlapping_discs_accumulate_alpha() {
        let mut canvas = canvas(8, 8);
        canvas.set_fill(Rgba::new(255, 255, 255, 0.5));
        canvas.fill_disc(Vec2::new(4.0, 4.0), 3.0);
        canvas.fill_disc(Vec2::new(4.0, 4.0), 3.0);
        let [_, _, _, a] = canvas.pixel(4, 4).unwrap();
        assert!(a > 128 && a < 255);
    }

    #[test]
    fn test_disc_off_canvas_is_clipped() {
        let mut canvas = canvas(10, 10);
        canvas.set_fill(Rgba::opaque(0, 255, 0));
        canvas.fill_disc(Vec2::new(0.0, 0.0), 3.0);
        canvas.fill_disc(Vec2::new(-50.0, 500.0), 3.0);
        canvas.fill_disc(Vec2::new(f32::NAN, 1.0), 3.0);
        assert_eq!(canvas.pixel(0, 0), Some([0, 255, 0, 255]));
        assert_eq!(canvas.pixel(9, 9), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_clear_resets_pixels() {
        let mut canvas = canvas(6, 6);
        canvas.set_fill(Rgba::opaque(1, 2, 3));
        canvas.fill_disc(Vec2::new(3.0, 3.0), 2.0);
        canvas.clear();
        assert!(canvas.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_scaled_canvas_draws_in_logical_units() {
        let mut canvas = PixelCanvas::new().with_scale(2.0);
        canvas.set_extent(Extent::new(10.0, 5.0));
        assert_eq!((canvas.width(), canvas.height()), (20, 10));

        canvas.set_fill(Rgba::opaque(0, 0, 255));
        canvas.fill_disc(Vec2::new(5.0, 2.5), 2.0);
        // logical radius 2 is 4 device pixels
        assert_eq!(canvas.pixel(10, 5), Some([0, 0, 255, 255]));
        assert_eq!(canvas.pixel(12, 5), Some([0, 0, 255, 255]));
        assert_eq!(canvas.pixel(16, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_invalid_scale_falls_back_to_one() {
        assert_eq!(PixelCanvas::new().with_scale(0.0).scale(), 1.0);
        assert_eq!(PixelCanvas::new().with_scale(f32::NAN).scale(), 1.0);
        assert_eq!(PixelCanvas::detached().with_scale(1.5).scale(), 1.5);
    }

    #[test]
    fn test_detached_canvas_has_no_context() {
        let mut canvas = PixelCanvas::detached();
        assert!(canvas.context().is_none());
    }
}
