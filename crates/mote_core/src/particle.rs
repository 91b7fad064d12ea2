use crate::config::FieldConfig;
use crate::math::{Extent, RandomSource, Vec2};

/// A drifting point rendered as a filled disc.
///
/// Velocity and radius are fixed at spawn; only the position changes
/// between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    position: Vec2,
    velocity: Vec2,
    radius: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Spawn a particle uniformly inside `extent` using the configured
    /// speed and size range.
    pub fn spawn<R: RandomSource + ?Sized>(extent: Extent, config: &FieldConfig, rng: &mut R) -> Self {
        let position = extent.wrap(Vec2::new(
            rng.next_f32() * extent.width,
            rng.next_f32() * extent.height,
        ));
        let half_speed = config.speed * 0.5;
        let velocity = Vec2::new(
            rng.range(-half_speed, half_speed),
            rng.range(-half_speed, half_speed),
        );
        let radius = rng.range(config.min_size, config.max_size);
        Self::new(position, velocity, radius)
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::DeterministicRng;

    #[test]
    fn test_spawn_respects_config_ranges() {
        let config = FieldConfig {
            speed: 2.0,
            min_size: 1.5,
            max_size: 4.0,
            ..FieldConfig::default()
        };
        let extent = Extent::new(320.0, 200.0);
        let mut rng = DeterministicRng::new(11);

        for _ in 0..1_000 {
            let p = Particle::spawn(extent, &config, &mut rng);
            assert!(extent.contains(p.position()));
            assert!(p.velocity().x >= -1.0 && p.velocity().x <= 1.0);
            assert!(p.velocity().y >= -1.0 && p.velocity().y <= 1.0);
            assert!(p.radius() >= 1.5 && p.radius() <= 4.0);
        }
    }

    #[test]
    fn test_zero_speed_spawns_still_particles() {
        let config = FieldConfig {
            speed: 0.0,
            min_size: 2.0,
            max_size: 2.0,
            ..FieldConfig::default()
        };
        let mut rng = DeterministicRng::new(5);
        let p = Particle::spawn(Extent::new(10.0, 10.0), &config, &mut rng);
        assert_eq!(p.velocity(), Vec2::ZERO);
        assert_eq!(p.radius(), 2.0);
    }
}
