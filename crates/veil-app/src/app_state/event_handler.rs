//! `ApplicationHandler` implementation for the winit event loop.

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use veil_common::{Size2D, VeilError};

use super::core::VeilApp;
use super::input::{key_action, KeyAction};

impl ApplicationHandler for VeilApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gl_window.is_some() {
            return;
        }
        if let Err(e) = self.initialize_window(event_loop) {
            self.fail(event_loop, e);
            return;
        }
        self.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Err(e) = self.resize(Size2D::new(size.width, size.height)) {
                    self.fail(event_loop, e);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_keyboard_input(event_loop, event);
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render_frame() {
                    self.fail(event_loop, e);
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // The background animates, so draw continuously.
        self.request_redraw();
    }
}

impl VeilApp {
    fn handle_keyboard_input(&mut self, event_loop: &ActiveEventLoop, event: KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let Some(action) = key_action(&event.logical_key) else {
            return;
        };
        match action {
            KeyAction::Quit => event_loop.exit(),
            KeyAction::ToggleBlur => {
                if let Some(ref mut renderer) = self.renderer {
                    let enabled = !renderer.is_blur_enabled();
                    renderer.set_blur_enabled(enabled);
                    tracing::info!("Blur {}", if enabled { "enabled" } else { "disabled" });
                }
            }
            KeyAction::CycleMask => {
                if let Some(ref mut renderer) = self.renderer {
                    let mask = renderer.cycle_mask();
                    tracing::info!("Blur mask: {mask:?}");
                }
            }
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: VeilError) {
        tracing::error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }
}
