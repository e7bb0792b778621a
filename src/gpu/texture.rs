//! Streaming frame texture: allocated once, updated in place across
//! frames.

pub struct StreamingTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl StreamingTexture {
    /// Allocate the backing texture at its final size. Storage is never
    /// resized; every later upload must stay inside this rectangle.
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        width: u32,
        height: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("frame_texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Border addressing keeps partial uploads from tiling: sampling
        // outside [0, 1] reads transparent black, never wrapped content.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("frame_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToBorder,
            address_mode_v: wgpu::AddressMode::ClampToBorder,
            address_mode_w: wgpu::AddressMode::ClampToBorder,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            border_color: Some(wgpu::SamplerBorderColor::TransparentBlack),
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            texture,
            bind_group,
            width,
            height,
        }
    }

    /// Upload a tightly packed RGBA buffer (`width * height * 4` bytes)
    /// into the top-left sub-rectangle. Texels outside the rectangle
    /// keep their previous contents. `width` and `height` must not
    /// exceed the allocated size.
    pub fn upload(&self, queue: &wgpu::Queue, width: u32, height: u32, pixels: &[u8]) {
        debug_assert!(
            width <= self.width && height <= self.height,
            "upload {width}x{height} exceeds allocated {}x{}",
            self.width,
            self.height,
        );
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        if width == 0 || height == 0 {
            return;
        }

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Allocated width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Allocated height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }
}
