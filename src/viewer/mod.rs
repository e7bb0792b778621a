//! Frame lifecycle: window and GPU ownership plus the per-frame
//! protocol.
//!
//! A frame moves through cleared → drawn → presented as a pair of
//! consuming typestates, so calling the stages out of order does not
//! compile. The caller owns the loop:
//!
//! ```no_run
//! use vistream::config::WindowConfig;
//! use vistream::viewer::Viewer;
//!
//! let mut viewer = Viewer::new(&WindowConfig::default()).unwrap();
//! let pixels = vec![0u8; 800 * 600 * 4];
//! while viewer.is_open() {
//!     let Some(mut frame) = viewer.begin_frame() else { continue };
//!     frame.upload(800, 600, &pixels);
//!     let mut frame = frame.render_scene();
//!     frame.overlay(|panels| {
//!         panels.panel("controls", |ui| {
//!             let _ = ui.button("noop");
//!         });
//!     });
//!     let _keys = frame.poll_keys();
//!     frame.finish();
//! }
//! ```

mod shell;

use std::error::Error;
use std::time::Duration;

use winit::event_loop::EventLoop;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};

use crate::config::WindowConfig;
use crate::gpu::{GpuState, QuadRenderer, StreamingTexture, pipeline};
use crate::keys::KeyMask;
use crate::overlay::{Overlay, Panels};

use shell::Shell;

/// The visualization window: one winit window, one wgpu device, one
/// persistently allocated frame texture. Owns the event loop and pumps
/// it at the end of every frame; all operations stay on the thread
/// that created it.
pub struct Viewer {
    shell: Shell,
    gpu: GpuState,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    quad: QuadRenderer,
    texture: StreamingTexture,
    overlay: Overlay,
    background: wgpu::Color,
    // Declared last so the window and surface drop before the loop.
    event_loop: EventLoop<()>,
}

impl Viewer {
    /// Open the window and build every GPU object. Called once; the
    /// streaming texture is allocated at the window's initial size and
    /// never reallocated, so a producer that changes resolution has to
    /// build a new viewer.
    pub fn new(config: &WindowConfig) -> Result<Self, Box<dyn Error>> {
        let mut event_loop = EventLoop::new()?;
        let mut shell = Shell::new(config);

        // Drive the loop until `resumed` has created the window.
        while shell.window.is_none() {
            event_loop.pump_app_events(Some(Duration::from_millis(10)), &mut shell);
        }
        let window = shell.window.clone().expect("window just created");

        let (gpu, surface, surface_config) = GpuState::new(&window, config.vsync);

        let frame_layout = pipeline::create_frame_bind_group_layout(&gpu.device);
        let quad = QuadRenderer::new(&gpu.device, &gpu.queue, gpu.surface_format, &frame_layout);
        let texture = StreamingTexture::new(
            &gpu.device,
            &frame_layout,
            surface_config.width,
            surface_config.height,
        );

        let overlay = Overlay::new(&gpu.device, gpu.surface_format);
        shell.egui = Some(egui_winit::State::new(
            overlay.context().clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            window.theme(),
            None,
        ));

        log::info!(
            "viewer ready: {}x{} \"{}\"",
            surface_config.width,
            surface_config.height,
            config.title,
        );

        Ok(Self {
            event_loop,
            shell,
            gpu,
            surface,
            surface_config,
            quad,
            texture,
            overlay,
            background: color(config.background),
        })
    }

    /// False once the user has requested the window to close. The
    /// caller's loop must stop driving frames after that.
    pub fn is_open(&self) -> bool {
        !self.shell.close_requested
    }

    /// Start a frame: apply any pending window resize to the surface,
    /// acquire the swapchain texture, and clear it to the background
    /// color. Returns `None` when no surface texture could be acquired
    /// this frame (the frame is skipped, not an error).
    pub fn begin_frame(&mut self) -> Option<Frame<'_>> {
        if let Some(size) = self.shell.resized.take() {
            self.surface_config.width = size.width.max(1);
            self.surface_config.height = size.height.max(1);
            self.surface.configure(&self.gpu.device, &self.surface_config);
        }

        let target = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.gpu.device, &self.surface_config);
                match self.surface.get_current_texture() {
                    Ok(t) => t,
                    Err(e) => {
                        log::warn!("skipping frame: {e}");
                        return None;
                    }
                }
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                panic!("out of GPU memory acquiring surface texture")
            }
            Err(e) => {
                log::warn!("skipping frame: {e}");
                return None;
            }
        };

        let view = target
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        Some(Frame {
            viewer: self,
            target,
            view,
            encoder,
        })
    }
}

/// A frame whose color buffer has been cleared. Pixel uploads happen
/// here, before the scene draw.
pub struct Frame<'v> {
    viewer: &'v mut Viewer,
    target: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

impl<'v> Frame<'v> {
    /// Upload new pixel data into the streaming texture; zero or more
    /// calls per frame. Queue ordering guarantees the upload lands
    /// before this frame's draw samples it.
    pub fn upload(&mut self, width: u32, height: u32, pixels: &[u8]) {
        self.viewer
            .texture
            .upload(&self.viewer.gpu.queue, width, height, pixels);
    }

    /// Draw the streamed frame as a fullscreen quad.
    pub fn render_scene(self) -> SceneFrame<'v> {
        let Self {
            viewer,
            target,
            view,
            mut encoder,
        } = self;

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            viewer.quad.draw(&mut rpass, &viewer.texture);
        }

        SceneFrame {
            viewer,
            target,
            view,
            encoder,
        }
    }
}

/// A frame with the scene drawn. The overlay and the key poll happen
/// here; `finish` presents.
pub struct SceneFrame<'v> {
    viewer: &'v mut Viewer,
    target: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

impl SceneFrame<'_> {
    /// Run the control panel for this frame. Optional; at most one call
    /// per frame (a second call replaces the first one's widgets).
    pub fn overlay(&mut self, build: impl FnMut(&mut Panels<'_>)) {
        let Some(window) = self.viewer.shell.window.clone() else {
            return;
        };
        let raw_input = match self.viewer.shell.egui.as_mut() {
            Some(egui) => egui.take_egui_input(&window),
            None => return,
        };
        let platform_output = self.viewer.overlay.run(raw_input, build);
        if let Some(egui) = self.viewer.shell.egui.as_mut() {
            egui.handle_platform_output(&window, platform_output);
        }
    }

    /// Keys newly pressed since the previous poll, one edge per press.
    /// Level state advances during [`finish`](Self::finish)'s event
    /// pump, so a press is reported on the first poll after the pump
    /// that observed it.
    pub fn poll_keys(&mut self) -> KeyMask {
        self.viewer.shell.keys.poll()
    }

    /// Paint the overlay (if one was run), submit, present, and pump
    /// window events. The pump is the only point where input, resize,
    /// and close state advance. Presenting may block on vsync.
    pub fn finish(self) {
        let Self {
            viewer,
            target,
            view,
            mut encoder,
        } = self;

        let size = [viewer.surface_config.width, viewer.surface_config.height];
        let user_buffers = viewer.overlay.paint(&viewer.gpu, &mut encoder, &view, size);

        viewer
            .gpu
            .queue
            .submit(user_buffers.into_iter().chain(std::iter::once(encoder.finish())));
        target.present();

        if let PumpStatus::Exit(_) =
            viewer
                .event_loop
                .pump_app_events(Some(Duration::ZERO), &mut viewer.shell)
        {
            viewer.shell.close_requested = true;
        }
    }
}

fn color([r, g, b, a]: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: f64::from(a),
    }
}
