//! wgpu setup: instance, adapter, device, and the window surface.

use std::sync::Arc;

use winit::window::Window;

/// Device-level GPU state, independent of any one frame.
pub struct GpuState {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
}

impl GpuState {
    /// Initialize the GPU and configure a surface for the window.
    ///
    /// There is no recovery path from a missing adapter or a failed
    /// device request, so setup failures panic with a clear diagnostic
    /// instead of limping on with partially initialized GPU state.
    pub fn new(
        window: &Arc<Window>,
        vsync: bool,
    ) -> (Self, wgpu::Surface<'static>, wgpu::SurfaceConfiguration) {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let surface = instance
            .create_surface(window.clone())
            .expect("failed to create wgpu surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("failed to find GPU adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("vistream"),
            // Border addressing is what keeps partial frame uploads
            // from tiling across the quad.
            required_features: wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER,
            required_limits: wgpu::Limits::default(),
            ..Default::default()
        }))
        .expect("failed to create GPU device");

        let caps = surface.get_capabilities(&adapter);
        // Use a non-sRGB format so producer-supplied sRGB bytes pass
        // through without double gamma correction.
        let surface_format = caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(caps.formats[0]);

        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        log::info!(
            "GPU init: adapter={}, format={surface_format:?}",
            adapter.get_info().name,
        );

        (
            Self {
                device,
                queue,
                surface_format,
            },
            surface,
            config,
        )
    }
}
