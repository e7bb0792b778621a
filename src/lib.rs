//! A live visualization window for streaming pixel buffers.
//!
//! A producer renders into an RGBA byte buffer each frame; `vistream`
//! shows it as a fullscreen textured quad, overlays an immediate-mode
//! control panel for nudging numeric parameters, and reports debounced
//! key presses back to the producer. The per-frame protocol is
//! documented on [`viewer::Viewer`].

pub mod capture;
pub mod config;
pub mod gpu;
pub mod keys;
pub mod overlay;
pub mod viewer;

pub use config::{CaptureConfig, Config, WindowConfig};
pub use keys::KeyMask;
pub use viewer::Viewer;
