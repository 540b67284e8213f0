//! Window creation and renderer initialization.

use std::rc::Rc;

use winit::event_loop::ActiveEventLoop;

use veil_common::VeilError;
use veil_renderer::{FrameRenderer, GlBackend, GlowBackend, GpuContext};

use crate::gl_window::GlWindow;

use super::core::VeilApp;

pub(super) fn renderer_error(err: veil_renderer::GlError) -> VeilError {
    VeilError::Renderer(err.to_string())
}

impl VeilApp {
    /// Create the window, the GL context and the frame renderer.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), VeilError> {
        let (gl_window, gl) = GlWindow::new(event_loop, &self.config.window)?;
        let backend: Rc<dyn GlBackend> = Rc::new(GlowBackend::new(gl));
        let mut gpu = GpuContext::new(backend).map_err(renderer_error)?;
        let renderer =
            FrameRenderer::new(&mut gpu, gl_window.size(), &self.config).map_err(renderer_error)?;

        self.gl_window = Some(gl_window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        Ok(())
    }
}
