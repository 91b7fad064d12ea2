//! Runtime settings
//!
//! One JSON document with a `window` and a `field` section. Either
//! section, and any key inside it, may be omitted.

use anyhow::{Context, Result};
use mote_core::FieldConfig;
use mote_render::WindowConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowConfig,
    pub field: FieldConfig,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.field.validate()?;
        Ok(settings)
    }
}
