//! Window management
//!
//! Cross-platform window creation via winit

use mote_core::Rgba;
use serde::{Deserialize, Serialize};
use winit::window::Window;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Color behind the transparent canvas.
    pub background: Rgba,
}

impl WindowConfig {
    /// Title with the field's layout hook appended, if it has one.
    pub fn title_with(&self, class_name: &str) -> String {
        if class_name.is_empty() {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, class_name)
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Mote".to_string(),
            width: 1280,
            height: 720,
            background: Rgba::opaque(17, 17, 17),
        }
    }
}

/// Create window attributes from config
pub fn window_attributes(config: &WindowConfig, class_name: &str) -> winit::window::WindowAttributes {
    Window::default_attributes()
        .with_title(config.title_with(class_name))
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
}
