//! Particle field engine
//!
//! Owns the population, the pointer and the surface extent. A frame is
//! `update` (drift, pointer repulsion, wraparound) followed by `render`
//! (clear, then one disc per particle in a single color). Particles never
//! interact with each other, so population order only affects draw order.

use crate::config::{FieldConfig, INTERACTION_RADIUS, MAX_PARTICLE_COUNT, REPULSION_STRENGTH};
use crate::math::{Extent, RandomSource, Vec2};
use crate::particle::Particle;
use crate::surface::DrawContext;
use crate::time::frame_steps;
use std::time::Duration;

pub struct ParticleField {
    config: FieldConfig,
    extent: Extent,
    particles: Vec<Particle>,
    /// `None` until the first pointer movement: nothing is repelled.
    pointer: Option<Vec2>,
    frames: u64,
}

impl ParticleField {
    /// Create a field at `extent` and seed its population.
    pub fn new<R: RandomSource + ?Sized>(config: FieldConfig, extent: Extent, rng: &mut R) -> Self {
        let mut field = Self {
            particles: Vec::with_capacity(config.particle_count.min(MAX_PARTICLE_COUNT)),
            config,
            extent,
            pointer: None,
            frames: 0,
        };
        field.spawn(rng);
        field
    }

    /// Create a field around an explicit population; the configured count
    /// follows the population size.
    pub fn with_particles(mut config: FieldConfig, extent: Extent, particles: Vec<Particle>) -> Self {
        config.particle_count = particles.len();
        Self {
            config,
            extent,
            particles,
            pointer: None,
            frames: 0,
        }
    }

    /// Discard the population and seed a fresh one at the current extent.
    pub fn spawn<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.particles.clear();
        for _ in 0..self.config.particle_count {
            let particle = Particle::spawn(self.extent, &self.config, rng);
            self.particles.push(particle);
        }
    }

    /// Adopt a new extent. The whole population is reseeded; individual
    /// particles do not survive a resize.
    pub fn resize<R: RandomSource + ?Sized>(&mut self, extent: Extent, rng: &mut R) {
        tracing::debug!(
            width = extent.width,
            height = extent.height,
            count = self.config.particle_count,
            "reseeding particle field"
        );
        self.extent = extent;
        self.spawn(rng);
    }

    /// Record the latest pointer position; takes effect on the next update.
    pub fn set_pointer(&mut self, position: Vec2) {
        self.pointer = Some(position);
    }

    /// Advance every particle by `steps` reference frames.
    pub fn update<R: RandomSource + ?Sized>(&mut self, steps: f32, rng: &mut R) {
        let extent = self.extent;
        let pointer = self.pointer;
        for particle in &mut self.particles {
            let mut position = particle.position() + particle.velocity() * steps;
            if let Some(pointer) = pointer {
                position += repulsion(position, pointer, rng) * steps;
            }
            particle.set_position(extent.wrap(position));
        }
        self.frames += 1;
    }

    /// Clear the context and draw every particle.
    pub fn render(&self, ctx: &mut dyn DrawContext) {
        ctx.clear();
        ctx.set_fill(self.config.particle_color);
        for particle in &self.particles {
            ctx.fill_disc(particle.position(), particle.radius());
        }
    }

    /// One frame: update for `dt`, then render.
    pub fn tick<R: RandomSource + ?Sized>(
        &mut self,
        dt: Duration,
        ctx: &mut dyn DrawContext,
        rng: &mut R,
    ) {
        self.update(frame_steps(dt), rng);
        self.render(ctx);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Number of updates run since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Positional nudge applied to a particle at `position` for one frame.
///
/// Points away from `pointer` with magnitude
/// `REPULSION_STRENGTH * (INTERACTION_RADIUS - d) / INTERACTION_RADIUS`,
/// zero at or beyond the interaction radius. A particle sitting exactly on
/// the pointer is pushed in a random direction at full strength.
pub fn repulsion<R: RandomSource + ?Sized>(position: Vec2, pointer: Vec2, rng: &mut R) -> Vec2 {
    let offset = position - pointer;
    let distance = offset.length();
    // also rejects NaN
    if !(distance < INTERACTION_RADIUS) {
        return Vec2::ZERO;
    }
    let direction = if distance > 0.0 {
        offset / distance
    } else {
        rng.unit_vector()
    };
    let falloff = (INTERACTION_RADIUS - distance) / INTERACTION_RADIUS;
    direction * (falloff * REPULSION_STRENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rgba;
    use crate::math::DeterministicRng;
    use crate::surface::{DrawCall, RecordingSurface, Surface};
    use crate::time::REFERENCE_FRAME;

    fn field_with(particles: Vec<Particle>, extent: Extent) -> ParticleField {
        ParticleField::with_particles(FieldConfig::default(), extent, particles)
    }

    #[test]
    fn test_spawn_count_matches_config() {
        let mut rng = DeterministicRng::new(1);
        for count in [0, 1, 3, 200, 1_000] {
            let config = FieldConfig {
                particle_count: count,
                ..FieldConfig::default()
            };
            let field = ParticleField::new(config, Extent::new(800.0, 600.0), &mut rng);
            assert_eq!(field.particles().len(), count);
        }
    }

    #[test]
    fn test_positions_stay_inside_extent() {
        let mut rng = DeterministicRng::new(2);
        let extent = Extent::new(300.0, 150.0);
        let config = FieldConfig {
            speed: 40.0,
            ..FieldConfig::default()
        };
        let mut field = ParticleField::new(config, extent, &mut rng);
        field.set_pointer(Vec2::new(150.0, 75.0));

        for _ in 0..500 {
            field.update(1.0, &mut rng);
            for p in field.particles() {
                assert!(extent.contains(p.position()), "{:?}", p.position());
            }
        }
    }

    #[test]
    fn test_radius_and_velocity_survive_frames() {
        let mut rng = DeterministicRng::new(3);
        let mut field = ParticleField::new(FieldConfig::default(), Extent::new(400.0, 400.0), &mut rng);
        field.set_pointer(Vec2::new(200.0, 200.0));
        let before: Vec<(f32, Vec2)> = field
            .particles()
            .iter()
            .map(|p| (p.radius(), p.velocity()))
            .collect();

        for _ in 0..60 {
            field.update(1.0, &mut rng);
        }

        let after: Vec<(f32, Vec2)> = field
            .particles()
            .iter()
            .map(|p| (p.radius(), p.velocity()))
            .collect();
        assert_eq!(before, after);
        for (radius, _) in after {
            assert!((1.0..=3.0).contains(&radius));
        }
    }

    #[test]
    fn test_no_repulsion_outside_radius() {
        let mut rng = DeterministicRng::new(4);
        let pointer = Vec2::new(0.0, 0.0);
        assert_eq!(repulsion(Vec2::new(150.0, 0.0), pointer, &mut rng), Vec2::ZERO);
        assert_eq!(repulsion(Vec2::new(151.0, 0.0), pointer, &mut rng), Vec2::ZERO);
        assert_eq!(repulsion(Vec2::new(200.0, 200.0), pointer, &mut rng), Vec2::ZERO);
    }

    #[test]
    fn test_repulsion_falls_off_with_distance() {
        let mut rng = DeterministicRng::new(5);
        let pointer = Vec2::new(500.0, 500.0);
        let mut previous = f32::INFINITY;
        for step in 1..=150 {
            let d = step as f32;
            let push = repulsion(pointer + Vec2::new(d, 0.0), pointer, &mut rng);
            let magnitude = push.length();
            assert!(magnitude <= previous, "not monotonic at d={d}");
            assert!(push.x >= 0.0 && push.y == 0.0, "must point away from pointer");
            previous = magnitude;
        }
        assert_eq!(previous, 0.0);

        let close = repulsion(pointer + Vec2::new(0.0, -1.5), pointer, &mut rng);
        let expected = REPULSION_STRENGTH * (INTERACTION_RADIUS - 1.5) / INTERACTION_RADIUS;
        assert!((close.length() - expected).abs() < 1e-4);
        assert!(close.y < 0.0);
    }

    #[test]
    fn test_zero_distance_uses_fallback_direction() {
        let mut rng = DeterministicRng::new(6);
        let pointer = Vec2::new(100.0, 100.0);
        let push = repulsion(pointer, pointer, &mut rng);
        assert!(push.is_finite());
        assert!((push.length() - REPULSION_STRENGTH).abs() < 1e-4);
    }

    #[test]
    fn test_one_frame_adds_velocity_without_pointer() {
        let extent = Extent::new(200.0, 200.0);
        let particles = vec![
            Particle::new(Vec2::new(10.0, 10.0), Vec2::new(0.25, -0.25), 1.0),
            Particle::new(Vec2::new(199.9, 50.0), Vec2::new(0.2, 0.0), 2.0),
        ];
        let mut field = field_with(particles, extent);
        let mut rng = DeterministicRng::new(7);

        field.update(1.0, &mut rng);

        assert_eq!(field.particles()[0].position(), Vec2::new(10.25, 9.75));
        // crossed the right edge, snapped to the left
        assert_eq!(field.particles()[1].position(), Vec2::new(0.0, 50.0));
        assert_eq!(field.frames(), 1);
    }

    #[test]
    fn test_resize_reseeds_inside_new_extent() {
        let mut rng = DeterministicRng::new(8);
        let mut field = ParticleField::new(FieldConfig::default(), Extent::new(1000.0, 1000.0), &mut rng);
        let small = Extent::new(50.0, 40.0);
        field.resize(small, &mut rng);

        assert_eq!(field.extent(), small);
        assert_eq!(field.particles().len(), 200);
        for p in field.particles() {
            assert!(small.contains(p.position()));
        }
    }

    #[test]
    fn test_render_clears_then_draws_single_color() {
        let color = Rgba::new(1, 2, 3, 0.25);
        let config = FieldConfig {
            particle_count: 4,
            particle_color: color,
            ..FieldConfig::default()
        };
        let mut rng = DeterministicRng::new(9);
        let field = ParticleField::new(config, Extent::new(64.0, 64.0), &mut rng);
        let mut surface = RecordingSurface::new();

        field.render(surface.context().unwrap());

        let calls = surface.calls();
        assert_eq!(calls[0], DrawCall::Clear);
        assert_eq!(calls[1], DrawCall::SetFill(color));
        assert_eq!(calls.len(), 2 + 4);
        let drawn: Vec<(Vec2, f32)> = surface.discs().collect();
        let expected: Vec<(Vec2, f32)> = field
            .particles()
            .iter()
            .map(|p| (p.position(), p.radius()))
            .collect();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn test_tick_of_reference_frame_is_one_step() {
        let extent = Extent::new(100.0, 100.0);
        let particles = vec![Particle::new(Vec2::new(50.0, 50.0), Vec2::new(0.5, 0.5), 1.0)];
        let mut field = field_with(particles, extent);
        let mut surface = RecordingSurface::new();
        let mut rng = DeterministicRng::new(10);

        field.tick(REFERENCE_FRAME, surface.context().unwrap(), &mut rng);

        assert_eq!(field.particles()[0].position(), Vec2::new(50.5, 50.5));
        assert_eq!(surface.discs().count(), 1);
    }
}
