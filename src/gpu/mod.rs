//! GPU rendering: wgpu state, the quad pipeline, and the streaming
//! frame texture.

pub mod pipeline;
pub mod quad;
pub mod state;
pub mod texture;

pub use quad::QuadRenderer;
pub use state::GpuState;
pub use texture::StreamingTexture;
