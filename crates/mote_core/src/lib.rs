//! Mote Core
//!
//! The particle field engine and its lifecycle host:
//! - Particle population, pointer repulsion and wraparound
//! - Frame time and the injectable random source
//! - Surfaces and drawing contexts
//! - Stage: mount/unmount, listeners and animation-frame requests

pub mod config;
pub mod error;
pub mod field;
pub mod math;
pub mod particle;
pub mod stage;
pub mod surface;
pub mod time;

pub use glam;

pub use config::{FieldConfig, Rgba};
pub use field::ParticleField;
pub use math::{DeterministicRng, Extent, RandomSource};
pub use particle::Particle;
pub use stage::{MountHandle, Stage};
pub use surface::{DrawContext, Surface};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
