//! Fixed fullscreen-quad renderer.

use super::pipeline::{self, QUAD_INDICES, QUAD_VERTICES, VERTEX_STRIDE};
use super::texture::StreamingTexture;

/// Owns the quad geometry and pipeline; geometry is uploaded once at
/// construction and never mutated.
pub struct QuadRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

impl QuadRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let pipeline = pipeline::create_quad_pipeline(device, format, frame_layout);

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quad_vertices"),
            size: QUAD_VERTICES.len() as u64 * VERTEX_STRIDE,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&vertex_buffer, 0, &vertex_bytes());

        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quad_indices"),
            size: (QUAD_INDICES.len() * 2) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&index_buffer, 0, &index_bytes());

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
        }
    }

    /// Record the indexed quad draw with the frame texture at group 0.
    /// Bindings are scoped to the enclosing render pass; nothing stays
    /// bound once the pass ends.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, frame: &StreamingTexture) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, frame.bind_group(), &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}

// Byte packing without unsafe code.

fn vertex_bytes() -> Vec<u8> {
    let mut data = Vec::with_capacity(QUAD_VERTICES.len() * VERTEX_STRIDE as usize);
    for vertex in &QUAD_VERTICES {
        for &coord in vertex {
            data.extend_from_slice(&coord.to_ne_bytes());
        }
    }
    data
}

fn index_bytes() -> Vec<u8> {
    QUAD_INDICES.iter().flat_map(|i| i.to_ne_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_bytes_match_declared_stride() {
        assert_eq!(
            vertex_bytes().len() as u64,
            QUAD_VERTICES.len() as u64 * VERTEX_STRIDE,
        );
    }

    #[test]
    fn index_bytes_are_u16_packed() {
        let bytes = index_bytes();
        assert_eq!(bytes.len(), QUAD_INDICES.len() * 2);
        let first = u16::from_ne_bytes([bytes[0], bytes[1]]);
        assert_eq!(first, QUAD_INDICES[0]);
    }
}
