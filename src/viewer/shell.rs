//! winit shell: window ownership, close/resize latches, raw key levels.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::config::WindowConfig;
use crate::keys::{self, KeyTracker};

/// Event-side state, driven whenever the viewer pumps the event loop.
pub(super) struct Shell {
    pub(super) window: Option<Arc<Window>>,
    pub(super) egui: Option<egui_winit::State>,
    pub(super) keys: KeyTracker,
    pub(super) close_requested: bool,
    pub(super) resized: Option<PhysicalSize<u32>>,
    width: u32,
    height: u32,
    title: String,
}

impl Shell {
    pub(super) fn new(config: &WindowConfig) -> Self {
        Self {
            window: None,
            egui: None,
            keys: KeyTracker::default(),
            close_requested: false,
            resized: None,
            width: config.width,
            height: config.height,
            title: config.title.clone(),
        }
    }
}

impl ApplicationHandler for Shell {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(self.width, self.height));
        let window = event_loop
            .create_window(attrs)
            .expect("failed to create window");
        self.window = Some(Arc::new(window));
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // The overlay sees every event first; events it consumes (e.g.
        // typing into a focused panel field) never reach the key tracker.
        let mut consumed = false;
        if let (Some(window), Some(egui)) = (self.window.as_ref(), self.egui.as_mut()) {
            consumed = egui.on_window_event(window, &event).consumed;
        }

        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(size) => self.resized = Some(size),
            WindowEvent::KeyboardInput { event, .. } if !consumed => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(action) = keys::action_for(code) {
                        self.keys.set_held(action, event.state == ElementState::Pressed);
                    }
                }
            }
            _ => {}
        }
    }
}
