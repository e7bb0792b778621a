//! Quad pipeline construction: embedded WGSL, vertex layout, bind group
//! layout.

/// Fullscreen quad corners in normalized device coordinates.
pub const QUAD_VERTICES: [[f32; 2]; 4] = [[-1.0, 1.0], [1.0, -1.0], [-1.0, -1.0], [1.0, 1.0]];

/// Two triangles covering the viewport, sharing the 0-1 diagonal.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 3, 1];

/// Vertex stride in bytes: one `vec2<f32>` position per vertex.
pub const VERTEX_STRIDE: u64 = 8;

const QUAD_ATTRS: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x2,
    offset: 0,
    shader_location: 0,
}];

pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: VERTEX_STRIDE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &QUAD_ATTRS,
    }
}

// --- WGSL Shader ---

// The vertex stage remaps clip-space corners to texture coordinates by
// the affine map tex = (pos + 1) / 2, with v flipped because texture
// origin is the top-left corner. The fragment stage samples the
// streamed frame; no per-draw uniforms exist.
const QUAD_SHADER_SRC: &str = "
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) tex_pos: vec2<f32>,
}

@vertex
fn vs_main(@location(0) pos: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.tex_pos = vec2<f32>((pos.x + 1.0) / 2.0, (1.0 - pos.y) / 2.0);
    out.position = vec4<f32>(pos, 0.0, 1.0);
    return out;
}

@group(0) @binding(0) var frame_texture: texture_2d<f32>;
@group(0) @binding(1) var frame_sampler: sampler;

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(frame_texture, frame_sampler, input.tex_pos);
}
";

// --- Pipeline creation ---

/// Frame texture bind group layout: group(0) binding(0) = texture,
/// binding(1) = sampler.
pub fn create_frame_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("frame_bind_group_layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Quad pipeline: draws the streamed frame as one opaque textured quad.
pub fn create_quad_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    frame_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("quad_shader"),
        source: wgpu::ShaderSource::Wgsl(QUAD_SHADER_SRC.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("quad_pipeline_layout"),
        bind_group_layouts: &[frame_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("quad_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[vertex_buffer_layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_spans_full_viewport() {
        for corner in [[-1.0, -1.0], [-1.0, 1.0], [1.0, -1.0], [1.0, 1.0]] {
            assert!(QUAD_VERTICES.contains(&corner), "missing corner {corner:?}");
        }
    }

    #[test]
    fn indices_cover_every_corner_with_two_triangles() {
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));

        let mut used = QUAD_INDICES.to_vec();
        used.sort_unstable();
        used.dedup();
        assert_eq!(used, [0, 1, 2, 3]);

        // Both triangles share the 0-1 diagonal, so the quad has no gap.
        let (a, b) = (&QUAD_INDICES[..3], &QUAD_INDICES[3..]);
        for shared in [0, 1] {
            assert!(a.contains(&shared) && b.contains(&shared));
        }
    }

    #[test]
    fn vertex_stride_matches_position_format() {
        let layout = vertex_buffer_layout();
        assert_eq!(layout.array_stride, VERTEX_STRIDE);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x2);
    }
}
