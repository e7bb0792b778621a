//! Immediate-mode control panel over the rendered frame.
//!
//! A thin facade over egui: a panel scope, a commit-on-enter float
//! field, a read-only float pair, and a button. Widgets are redeclared
//! every frame inside the closure handed to
//! [`SceneFrame::overlay`](crate::viewer::SceneFrame::overlay); matched
//! panel begin/end is enforced by scoping rather than paired calls.
//! Event translation lives in the window shell (egui-winit); painting
//! happens in a dedicated render pass after the quad, so no GUI state
//! survives into the next frame's clear.

use egui_wgpu::{Renderer as EguiRenderer, ScreenDescriptor};

use crate::gpu::GpuState;

const FIELD_WIDTH: f32 = 110.0;

/// Overlay context: egui state plus the GPU resources to paint it.
pub struct Overlay {
    ctx: egui::Context,
    renderer: EguiRenderer,
    output: Option<egui::FullOutput>,
}

impl Overlay {
    pub(crate) fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            ctx: egui::Context::default(),
            renderer: EguiRenderer::new(device, surface_format, None, 1, false),
            output: None,
        }
    }

    pub(crate) fn context(&self) -> &egui::Context {
        &self.ctx
    }

    /// Run one GUI frame. Panel declarations happen inside `build`; the
    /// resulting draw data is stashed until [`paint`](Self::paint).
    /// Returns the platform output the winit side has to apply.
    pub(crate) fn run(
        &mut self,
        raw_input: egui::RawInput,
        mut build: impl FnMut(&mut Panels<'_>),
    ) -> egui::PlatformOutput {
        let ctx = self.ctx.clone();
        let mut full = ctx.run(raw_input, |ctx| build(&mut Panels { ctx }));
        let platform_output = std::mem::take(&mut full.platform_output);
        self.output = Some(full);
        platform_output
    }

    /// Paint the stashed GUI frame over the scene, if one was run this
    /// frame. Returns command buffers produced by egui's own callbacks,
    /// to be submitted before the frame encoder.
    pub(crate) fn paint(
        &mut self,
        gpu: &GpuState,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
    ) -> Vec<wgpu::CommandBuffer> {
        let Some(full) = self.output.take() else {
            return Vec::new();
        };

        for (id, delta) in &full.textures_delta.set {
            self.renderer
                .update_texture(&gpu.device, &gpu.queue, *id, delta);
        }

        let primitives = self.ctx.tessellate(full.shapes, full.pixels_per_point);
        let screen = ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: full.pixels_per_point,
        };
        let user_buffers =
            self.renderer
                .update_buffers(&gpu.device, &gpu.queue, encoder, &primitives, &screen);

        {
            let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
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
            });
            self.renderer
                .render(&mut rpass.forget_lifetime(), &primitives, &screen);
        }

        for id in &full.textures_delta.free {
            self.renderer.free_texture(id);
        }

        user_buffers
    }
}

/// Host for panel declarations during one GUI frame.
pub struct Panels<'a> {
    ctx: &'a egui::Context,
}

impl Panels<'_> {
    /// Open a named panel; widgets are valid only inside the closure.
    /// One panel at a time is the supported pattern.
    pub fn panel<R>(&mut self, title: &str, add: impl FnOnce(&mut PanelUi<'_>) -> R) -> Option<R> {
        egui::Window::new(title)
            .show(self.ctx, |ui| add(&mut PanelUi { ui }))
            .and_then(|response| response.inner)
    }
}

/// Widgets available inside a panel scope.
pub struct PanelUi<'u> {
    ui: &'u mut egui::Ui,
}

impl PanelUi<'_> {
    /// Editable numeric field in scientific notation.
    ///
    /// The bound slot is overwritten only when the user commits with
    /// Enter; an edit abandoned by focus loss is discarded and the
    /// field snaps back to the slot's value. Returns whether a commit
    /// happened this frame.
    pub fn float_input(&mut self, label: &str, value: &mut f32) -> bool {
        let id = self.ui.id().with(label);
        let mut text = self
            .ui
            .data_mut(|data| data.get_temp::<String>(id))
            .unwrap_or_else(|| format_scientific(*value));

        let response = self
            .ui
            .horizontal(|ui| {
                let response =
                    ui.add(egui::TextEdit::singleline(&mut text).desired_width(FIELD_WIDTH));
                ui.label(label);
                response
            })
            .inner;

        let mut committed = false;
        if response.lost_focus() && self.ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            if let Some(parsed) = parse_commit(&text) {
                *value = parsed;
                committed = true;
            }
        }

        if response.has_focus() {
            // Keep the in-progress edit; otherwise the field reformats
            // from the slot on the next frame.
            self.ui.data_mut(|data| data.insert_temp(id, text));
        } else {
            self.ui.data_mut(|data| data.remove::<String>(id));
        }
        committed
    }

    /// Read-only two-component numeric display, scientific notation.
    /// Never mutates its input.
    pub fn float2_display(&mut self, label: &str, value: [f32; 2]) {
        self.ui.horizontal(|ui| {
            for component in value {
                let mut text = format_scientific(component);
                ui.add(
                    egui::TextEdit::singleline(&mut text)
                        .desired_width(FIELD_WIDTH)
                        .interactive(false),
                );
            }
            ui.label(label);
        });
    }

    /// True exactly on the frame the button is clicked.
    pub fn button(&mut self, label: &str) -> bool {
        self.ui.button(label).clicked()
    }
}

/// Parse a committed edit. Anything that is not a finite float leaves
/// the slot untouched.
fn parse_commit(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

fn format_scientific(value: f32) -> String {
    format!("{value:e}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_overwrites_with_parsed_value() {
        let mut slot = 1.5_f32;
        if let Some(v) = parse_commit("2.75") {
            slot = v;
        }
        assert_eq!(slot, 2.75);
    }

    #[test]
    fn unparsable_commit_leaves_slot_untouched() {
        let mut slot = 1.5_f32;
        for text in ["", "abc", "1.2.3", "NaN", "inf"] {
            if let Some(v) = parse_commit(text) {
                slot = v;
            }
            assert_eq!(slot, 1.5, "{text:?} must not commit");
        }
    }

    #[test]
    fn commit_accepts_scientific_notation() {
        assert_eq!(parse_commit("1.5e3"), Some(1500.0));
        assert_eq!(parse_commit(" -2e-2 "), Some(-0.02));
    }

    #[test]
    fn scientific_format_round_trips() {
        for value in [1.5_f32, -0.25, 1500.0, 0.0] {
            let text = format_scientific(value);
            assert_eq!(parse_commit(&text), Some(value), "{text}");
        }
    }
}
