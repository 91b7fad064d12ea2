use thiserror::Error;

/// Errors raised while parsing or validating a [`FieldConfig`](crate::config::FieldConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid color '{input}': {source}")]
    InvalidColor {
        input: String,
        source: csscolorparser::ParseColorError,
    },

    #[error("particleCount {count} exceeds the limit of {max}")]
    TooManyParticles { count: usize, max: usize },

    #[error("speed must be finite and non-negative, got {0}")]
    InvalidSpeed(f32),

    #[error("particle size must be finite and non-negative, got {0}")]
    InvalidSize(f32),

    #[error("minSize ({min}) is larger than maxSize ({max})")]
    InvertedSizeRange { min: f32, max: f32 },
}

/// Reasons a mount is refused. Never surfaced to the host: the stage logs
/// them and the field simply renders nothing.
#[derive(Debug, Error)]
pub enum MountError {
    #[error("surface has no drawing context")]
    ContextUnavailable,

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}
