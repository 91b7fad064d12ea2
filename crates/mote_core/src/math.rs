//! Deterministic math utilities
//!
//! Re-exports glam with the surface extent, wraparound and the injectable
//! random source used by spawn and update.

pub use glam::*;

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::time::{SystemTime, UNIX_EPOCH};

/// Drawable size of a surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Extent of a surface measured in whole pixels.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// True when `point` lies in `[0, width) x [0, height)`.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x < self.width && point.y >= 0.0 && point.y < self.height
    }

    /// Bring `point` back into the extent, snapping each axis to the
    /// opposite edge when it has left `[0, limit)`.
    pub fn wrap(&self, point: Vec2) -> Vec2 {
        Vec2::new(wrap_coord(point.x, self.width), wrap_coord(point.y, self.height))
    }
}

/// Wrap a single coordinate into `[0, limit)`.
///
/// Values below zero land on the last representable coordinate before
/// `limit`, values at or past `limit` land on zero. Empty axes pin to zero.
pub fn wrap_coord(value: f32, limit: f32) -> f32 {
    if !(limit > 0.0) || value.is_nan() || value >= limit {
        0.0
    } else if value < 0.0 {
        just_below(limit)
    } else {
        value
    }
}

/// Largest f32 strictly less than a positive `limit`.
fn just_below(limit: f32) -> f32 {
    f32::from_bits(limit.to_bits() - 1)
}

/// Source of uniformly distributed randomness.
///
/// Spawn and the zero-distance repulsion fallback draw from this trait so
/// tests can feed a seeded generator instead of ambient entropy.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform float in `[0, 1)`.
    fn next_f32(&mut self) -> f32 {
        // 24 significant bits keep the result strictly below 1.0
        (self.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
    }

    /// Uniform float in `[lo, hi)`; returns `lo` when the range is empty.
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Uniformly distributed direction on the unit circle.
    fn unit_vector(&mut self) -> Vec2 {
        Vec2::from_angle(self.next_f32() * TAU)
    }
}

/// Seedable SplitMix64 generator.
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    seed: u64,
    state: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, state: seed }
    }

    /// Seed from the wall clock, for hosts that do not care about replay.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x853c_49e6_748f_ea9b);
        Self::new(nanos ^ 0x9e37_79b9_7f4a_7c15)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

impl RandomSource for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_keeps_interior_values() {
        assert_eq!(wrap_coord(12.5, 100.0), 12.5);
        assert_eq!(wrap_coord(0.0, 100.0), 0.0);
    }

    #[test]
    fn test_wrap_snaps_to_opposite_edge() {
        assert_eq!(wrap_coord(100.0, 100.0), 0.0);
        assert_eq!(wrap_coord(107.0, 100.0), 0.0);

        let snapped = wrap_coord(-0.25, 100.0);
        assert!(snapped < 100.0);
        assert!(snapped > 99.99);
    }

    #[test]
    fn test_wrap_empty_axis_pins_to_zero() {
        assert_eq!(wrap_coord(5.0, 0.0), 0.0);
        assert_eq!(wrap_coord(-5.0, 0.0), 0.0);
        assert_eq!(wrap_coord(f32::NAN, 10.0), 0.0);
    }

    #[test]
    fn test_extent_contains_is_half_open() {
        let extent = Extent::new(640.0, 480.0);
        assert!(extent.contains(Vec2::new(0.0, 0.0)));
        assert!(extent.contains(Vec2::new(639.9, 479.9)));
        assert!(!extent.contains(Vec2::new(640.0, 10.0)));
        assert!(!extent.contains(Vec2::new(10.0, -0.1)));
        assert!(extent.contains(extent.wrap(Vec2::new(-3.0, 480.0))));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = DeterministicRng::new(42);
        let mut b = DeterministicRng::new(42);
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn test_next_f32_is_unit_interval() {
        let mut rng = DeterministicRng::new(7);
        for _ in 0..10_000 {
            let value = rng.next_f32();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_unit_vector_has_unit_length() {
        let mut rng = DeterministicRng::new(3);
        for _ in 0..100 {
            let v = rng.unit_vector();
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }
}
