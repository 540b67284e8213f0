use tracing::trace;
use veil_common::Rect2D;

use crate::context::GpuContext;
use crate::error::GlResult;
use crate::gl::ClearMask;
use crate::program::UniformKey;

use super::FrameRenderer;

const IMAGE: UniformKey = UniformKey::new("uImage");

impl FrameRenderer {
    /// Render one frame into the default framebuffer.
    ///
    /// `elapsed` is seconds since start and drives the background animation.
    pub fn render(&mut self, ctx: &mut GpuContext, elapsed: f32) -> GlResult<()> {
        let scene = &self.scene;
        scene.framebuffer.bind();
        scene.framebuffer.apply_viewport();
        scene.framebuffer.clear(ClearMask::DEPTH | ClearMask::STENCIL);

        self.background.draw(ctx, elapsed)?;

        if self.blur_enabled {
            self.blur.apply(
                ctx,
                &scene.color,
                &scene.framebuffer,
                self.mask,
                &self.blur_config,
            )?;
        }

        self.present.bind();
        self.present
            .with_sampler_scope(ctx.texture_units_mut(), |samplers| {
                samplers.set_texture(IMAGE, &scene.color, None)
            })?;
        ctx.set_viewport(Rect2D::from_size(self.size));
        ctx.clear_default(ClearMask::COLOR | ClearMask::DEPTH);
        ctx.draw_quad();

        self.frames += 1;
        trace!(frame = self.frames, blur = self.blur_enabled, "frame rendered");
        Ok(())
    }
}
