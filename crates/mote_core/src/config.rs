//! Field configuration
//!
//! Keys mirror the component props (`particleCount`, `particleColor`, ...)
//! so an existing props object deserializes unchanged.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Radius around the pointer inside which particles are pushed away.
pub const INTERACTION_RADIUS: f32 = 150.0;

/// Displacement applied per frame at zero distance from the pointer.
pub const REPULSION_STRENGTH: f32 = 8.0;

/// Largest population a field accepts.
pub const MAX_PARTICLE_COUNT: usize = 100_000;

/// Particle field settings. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldConfig {
    pub particle_count: usize,
    pub particle_color: Rgba,
    /// Velocity components are drawn from `[-speed/2, speed/2]`.
    pub speed: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// Layout hook for the hosting surface (`className`, or `style`);
    /// opaque to the engine.
    #[serde(alias = "style")]
    pub class_name: String,
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count > MAX_PARTICLE_COUNT {
            return Err(ConfigError::TooManyParticles {
                count: self.particle_count,
                max: MAX_PARTICLE_COUNT,
            });
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        for size in [self.min_size, self.max_size] {
            if !size.is_finite() || size < 0.0 {
                return Err(ConfigError::InvalidSize(size));
            }
        }
        if self.min_size > self.max_size {
            return Err(ConfigError::InvertedSizeRange {
                min: self.min_size,
                max: self.max_size,
            });
        }
        Ok(())
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 200,
            particle_color: Rgba::new(150, 150, 150, 0.5),
            speed: 0.5,
            min_size: 1.0,
            max_size: 3.0,
            class_name: String::new(),
        }
    }
}

/// Straight (non-premultiplied) sRGB color with fractional alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Components scaled to `[0, 1]`, alpha clamped.
    pub fn to_f32(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a.clamp(0.0, 1.0),
        ]
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = ConfigError;

    /// Accepts any CSS color: hex, `rgb()` / `rgba()` in comma or space
    /// syntax, `hsl()`, `hwb()`, named colors and `transparent`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let color = csscolorparser::parse(input).map_err(|source| ConfigError::InvalidColor {
            input: input.to_string(),
            source,
        })?;
        let [r, g, b, _] = color.to_rgba8();
        // a NaN alpha draws nothing
        let alpha = if color.a.is_nan() { 0.0 } else { color.a.clamp(0.0, 1.0) };
        Ok(Self::new(r, g, b, alpha))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}
