//! Frame rendering.

use std::time::Instant;

use veil_common::Size2D;

use super::core::VeilApp;
use super::init::renderer_error;

impl VeilApp {
    /// Render and present one frame.
    pub(super) fn render_frame(&mut self) -> Result<(), veil_common::VeilError> {
        let (Some(renderer), Some(gpu), Some(window)) =
            (&mut self.renderer, &mut self.gpu, &self.gl_window)
        else {
            return Ok(());
        };

        let now = Instant::now();
        let elapsed = self.clock.tick(now);
        renderer.render(gpu, elapsed).map_err(renderer_error)?;
        window.swap_buffers()?;

        if self.clock.should_report(now) {
            tracing::debug!(
                fps = format!("{:.1}", self.clock.fps()),
                frame_ms = format!("{:.2}", self.clock.frame_time_ms()),
                frames = renderer.frames_rendered(),
                "frame stats"
            );
        }
        Ok(())
    }

    /// Resize the surface and rebuild the size-dependent render targets.
    pub(super) fn resize(&mut self, size: Size2D) -> Result<(), veil_common::VeilError> {
        if let Some(ref window) = self.gl_window {
            window.resize(size);
        }
        if let (Some(renderer), Some(gpu)) = (&mut self.renderer, &mut self.gpu) {
            renderer.resize(gpu, size).map_err(renderer_error)?;
        }
        Ok(())
    }
}
