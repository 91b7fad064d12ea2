//! Mote Render
//!
//! Desktop output for the particle field: a software canvas the field
//! draws into, a wgpu presenter that puts it on screen, and window setup.

pub mod canvas;
pub mod presenter;
pub mod window;

pub use wgpu;
pub use winit;

pub use canvas::PixelCanvas;
pub use presenter::{PresentError, Presenter};
pub use window::{window_attributes, WindowConfig};
