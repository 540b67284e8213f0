use std::rc::Rc;

use tracing::info;
use veil_common::Rect2D;

use crate::error::GlResult;
use crate::gl::{
    Capability, ClearMask, CompareFunc, GlBackend, GlHandle, ObjectKind, Primitive, StencilOp,
};
use crate::texture_units::TextureUnitCache;

// ---------------------------------------------------------------------------
// GpuContext
// ---------------------------------------------------------------------------

/// Per-context renderer state: the driver, the one texture binding cache and
/// the attribute-less vertex array used for screen-space quads.
pub struct GpuContext {
    gl: Rc<dyn GlBackend>,
    texture_units: TextureUnitCache,
    quad_vao: GlHandle,
}

impl GpuContext {
    pub fn new(gl: Rc<dyn GlBackend>) -> GlResult<Self> {
        let texture_units = TextureUnitCache::new(Rc::clone(&gl));
        let quad_vao = GlHandle::create(&gl, ObjectKind::VertexArray)?;
        info!(
            texture_units = texture_units.maximum_texture_units(),
            color_attachments = gl.max_color_attachments(),
            draw_buffers = gl.max_draw_buffers(),
            "GPU context ready"
        );
        Ok(Self {
            gl,
            texture_units,
            quad_vao,
        })
    }

    pub fn gl(&self) -> &Rc<dyn GlBackend> {
        &self.gl
    }

    pub fn texture_units(&self) -> &TextureUnitCache {
        &self.texture_units
    }

    pub fn texture_units_mut(&mut self) -> &mut TextureUnitCache {
        &mut self.texture_units
    }

    /// Draw a 4-vertex triangle strip. Vertex shaders derive the corner
    /// from `gl_VertexID`.
    pub fn draw_quad(&self) {
        self.gl.bind_vertex_array(Some(self.quad_vao.name()));
        self.gl.draw_arrays(Primitive::TriangleStrip, 0, 4);
    }

    pub fn enable(&self, capability: Capability) {
        self.gl.enable(capability);
    }

    pub fn disable(&self, capability: Capability) {
        self.gl.disable(capability);
    }

    pub fn set_stencil_func(&self, func: CompareFunc, reference: i32, mask: u32) {
        self.gl.stencil_func(func, reference, mask);
    }

    pub fn set_stencil_op(&self, stencil_fail: StencilOp, depth_fail: StencilOp, pass: StencilOp) {
        self.gl.stencil_op(stencil_fail, depth_fail, pass);
    }

    pub fn set_stencil_mask(&self, mask: u32) {
        self.gl.stencil_mask(mask);
    }

    /// Enable or disable writes to all four color channels.
    pub fn set_color_writes(&self, enabled: bool) {
        self.gl.color_mask(enabled, enabled, enabled, enabled);
    }

    pub fn bind_default_framebuffer(&self) {
        self.gl.bind_framebuffer(None);
    }

    pub fn set_viewport(&self, rect: Rect2D) {
        self.gl.viewport(rect);
    }

    /// Bind the window framebuffer and clear it.
    pub fn clear_default(&self, mask: ClearMask) {
        self.bind_default_framebuffer();
        self.gl.clear(mask);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::{GlCall, RecordingBackend};
    use veil_common::Size2D;

    #[test]
    fn new_creates_quad_vertex_array() {
        let gl = Rc::new(RecordingBackend::new());
        let _ctx = GpuContext::new(gl.clone()).unwrap();
        assert_eq!(
            gl.calls(),
            vec![GlCall::CreateObject(ObjectKind::VertexArray, 1)]
        );
    }

    #[test]
    fn draw_quad_is_a_four_vertex_strip() {
        let gl = Rc::new(RecordingBackend::new());
        let ctx = GpuContext::new(gl.clone()).unwrap();
        gl.clear_calls();
        ctx.draw_quad();
        assert_eq!(
            gl.calls(),
            vec![
                GlCall::BindVertexArray(Some(1)),
                GlCall::DrawArrays(Primitive::TriangleStrip, 0, 4),
            ]
        );
    }

    #[test]
    fn clear_default_binds_window_framebuffer_first() {
        let gl = Rc::new(RecordingBackend::new());
        let ctx = GpuContext::new(gl.clone()).unwrap();
        gl.clear_calls();
        ctx.set_viewport(Rect2D::from_size(Size2D::new(10, 20)));
        ctx.clear_default(ClearMask::COLOR | ClearMask::DEPTH);
        assert_eq!(
            gl.calls(),
            vec![
                GlCall::Viewport(Rect2D::new(0, 0, 10, 20)),
                GlCall::BindFramebuffer(None),
                GlCall::Clear(ClearMask::COLOR | ClearMask::DEPTH),
            ]
        );
    }

    #[test]
    fn dropping_context_deletes_vertex_array() {
        let gl = Rc::new(RecordingBackend::new());
        let ctx = GpuContext::new(gl.clone()).unwrap();
        gl.clear_calls();
        drop(ctx);
        assert_eq!(
            gl.calls(),
            vec![GlCall::DeleteObject(ObjectKind::VertexArray, 1)]
        );
    }
}
